use camino::Utf8PathBuf;
use clap::Args;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};

use super::defaults::{MIN_TE_EVENT_READS, TE_MATCH_DISTANCE};
use super::utils::{canonicalize_path, check_optional_filename, check_required_filename};
use crate::cluster_te::TeClusterSettings;

#[derive(Args, Default, Deserialize, Serialize)]
pub struct TeCallSettings {
    /// Directory for all cluster-te command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_te_output"))]
    pub output_dir: Utf8PathBuf,

    /// Unique reads of unique/multi read pairs, gzip-compressed or plain text
    ///
    /// Each line gives the name, mapping quality, chromosome, start, stop and strand of the
    /// uniquely mapped read of a pair whose mate maps to multiple locations.
    ///
    #[arg(long = "umu", value_name = "FILE")]
    pub umu_filename: Utf8PathBuf,

    /// Multi-mapped reads of unique/multi read pairs, gzip-compressed or plain text
    ///
    /// When given together with --ref-te, only unique reads with a multi-mapped mate alignment
    /// hitting a reference TE are clustered.
    ///
    #[arg(long = "umm", value_name = "FILE", requires = "ref_te_filename")]
    pub umm_filename: Option<Utf8PathBuf>,

    /// Reference TE intervals in `chrom start stop` format, using 1-based closed coordinates
    ///
    /// Used to annotate each event with its distance to reference TEs. If not given, annotation
    /// fields are reported as -1.
    ///
    #[arg(long = "ref-te", value_name = "FILE")]
    pub ref_te_filename: Option<Utf8PathBuf>,

    /// Upper limit on the insert size distribution, used as the clustering distance for anchors
    /// on the same strand
    #[arg(long, value_name = "SIZE")]
    pub insert_size: u64,

    /// Max distance for joining left and right ends of candidate TE insertions
    #[arg(long, value_name = "DISTANCE", default_value_t = TE_MATCH_DISTANCE)]
    pub mdist: u64,

    /// Minimum total anchor reads over both sides of a TE event for it to be reported
    #[arg(long, default_value_t = MIN_TE_EVENT_READS)]
    pub min_reads: usize,

    #[arg(hide = true, long)]
    pub disable_path_canonicalization: bool,
}

impl TeCallSettings {
    pub fn get_cluster_settings(&self) -> TeClusterSettings {
        TeClusterSettings {
            insert_size: self.insert_size,
            match_distance: self.mdist,
            min_read_count: self.min_reads,
        }
    }
}

pub fn validate_and_fix_te_call_settings(
    mut settings: TeCallSettings,
) -> SimpleResult<TeCallSettings> {
    check_required_filename(&settings.umu_filename, "unique read")?;
    check_optional_filename(settings.umm_filename.as_ref(), "multi-mapped read")?;
    check_optional_filename(settings.ref_te_filename.as_ref(), "reference TE")?;

    if settings.umm_filename.is_some() && settings.ref_te_filename.is_none() {
        bail!("--umm requires --ref-te");
    }

    if settings.min_reads == 0 {
        bail!("--min-reads argument must be greater than 0");
    }

    if !settings.disable_path_canonicalization {
        settings.umu_filename = canonicalize_path(&settings.umu_filename)?;
        settings.umm_filename = settings
            .umm_filename
            .map(|x| canonicalize_path(&x))
            .transpose()?;
        settings.ref_te_filename = settings
            .ref_te_filename
            .map(|x| canonicalize_path(&x))
            .transpose()?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_umu() {
        let settings = TeCallSettings {
            umu_filename: Utf8PathBuf::from("/nonexistent/pecluster/umu.gz"),
            min_reads: 1,
            ..Default::default()
        };
        assert!(validate_and_fix_te_call_settings(settings).is_err());
    }
}
