use std::fs::File;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::Serialize;
use simple_error::{SimpleResult, bail, try_with};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// Check a required input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_required_filename(filename: &Utf8Path, label: &str) -> SimpleResult<()> {
    if filename.as_str().is_empty() {
        bail!("Must specify {} file", label);
    }
    if !filename.exists() {
        bail!("Can't find specified {} file: '{}'", label, filename);
    }
    if !filename.is_file() {
        bail!(
            "Specified {} file path does not appear to be a file: '{}'",
            label,
            filename
        );
    }
    Ok(())
}

/// Check an optional input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_optional_filename(
    filename_opt: Option<&Utf8PathBuf>,
    label: &str,
) -> SimpleResult<()> {
    if let Some(filename) = filename_opt {
        check_required_filename(filename, label)?;
    }
    Ok(())
}

pub fn canonicalize_path(path: &Utf8Path) -> SimpleResult<Utf8PathBuf> {
    Ok(try_with!(
        path.canonicalize_utf8(),
        "Unable to canonicalize path: '{}'",
        path
    ))
}

/// Write command settings to the output directory in json format
///
/// * `label` - settings description used in logging and error messages
///
pub fn write_settings<T: Serialize>(
    output_dir: &Utf8Path,
    label: &str,
    settings: &T,
) -> SimpleResult<()> {
    let filename = output_dir.join(SETTINGS_FILENAME);

    info!("Writing {label} settings to file: '{filename}'");

    let f = try_with!(
        File::create(&filename),
        "Unable to create {} settings json file: '{}'",
        label,
        filename
    );

    try_with!(
        serde_json::to_writer_pretty(&f, settings),
        "Unable to write {} settings json file: '{}'",
        label,
        filename
    );
    Ok(())
}
