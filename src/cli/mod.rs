mod defaults;
mod linked_call;
mod shared;
mod te_call;
mod utils;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use simple_error::{SimpleResult, bail};

pub use self::linked_call::LinkedCallSettings;
use self::linked_call::validate_and_fix_linked_call_settings;
use self::shared::validate_and_fix_shared_settings;
pub use self::shared::SharedSettings;
pub use self::te_call::TeCallSettings;
use self::te_call::validate_and_fix_te_call_settings;
pub use self::utils::write_settings;

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster divergent, parallel and unlinked read pairs into candidate structural variants
    ClusterLinked(LinkedCallSettings),

    /// Cluster unique anchor reads of unique/multi read pairs into candidate TE insertions
    ClusterTe(TeCallSettings),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    pub fn get_output_dir(&self) -> &Utf8Path {
        match &self.command {
            Commands::ClusterLinked(x) => &x.output_dir,
            Commands::ClusterTe(x) => &x.output_dir,
        }
    }
}

/// Checks if a directory does not exist
///
pub fn check_novel_dirname(dirname: &Utf8Path, label: &str) -> SimpleResult<()> {
    if dirname.exists() {
        bail!("{} already exists: \"{}\"", label, dirname);
    }
    Ok(())
}

/// Validate settings and update parameters that can't be processed by clap
///
fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.shared = validate_and_fix_shared_settings(settings.shared)?;

    settings.command = match settings.command {
        Commands::ClusterLinked(x) => {
            let x = validate_and_fix_linked_call_settings(x)?;
            Commands::ClusterLinked(x)
        }
        Commands::ClusterTe(x) => {
            let x = validate_and_fix_te_call_settings(x)?;
            Commands::ClusterTe(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes no logger has been configured yet
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {}", msg);
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Settings::command().debug_assert();
    }

    #[test]
    fn test_parse_cluster_te() {
        let settings = Settings::try_parse_from([
            "pecluster",
            "cluster-te",
            "--umu",
            "umu.gz",
            "--insert-size",
            "300",
        ])
        .unwrap();
        let Commands::ClusterTe(te_settings) = settings.command else {
            panic!("Wrong subcommand");
        };
        assert_eq!(te_settings.insert_size, 300);
        assert_eq!(te_settings.mdist, 1000);
        assert_eq!(te_settings.min_reads, 1);
        assert!(te_settings.ref_te_filename.is_none());
    }

    #[test]
    fn test_parse_cluster_linked() {
        let settings = Settings::try_parse_from([
            "pecluster",
            "--threads",
            "2",
            "cluster-linked",
            "--evidence",
            "a.gz",
            "b.gz",
            "--mdist",
            "500",
        ])
        .unwrap();
        let Commands::ClusterLinked(linked_settings) = settings.command else {
            panic!("Wrong subcommand");
        };
        assert_eq!(linked_settings.evidence_filenames.len(), 2);
        assert_eq!(linked_settings.mdist, 500);
        assert_eq!(linked_settings.min_mapq, 30);
    }

    #[test]
    fn test_umm_requires_ref_te() {
        let result = Settings::try_parse_from([
            "pecluster",
            "cluster-te",
            "--umu",
            "umu.gz",
            "--umm",
            "umm.gz",
            "--insert-size",
            "300",
        ]);
        assert!(result.is_err());
    }
}
