use camino::Utf8PathBuf;
use clap::Args;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};

use super::defaults::{MAX_GAP, MAX_MISMATCHES, MIN_MAPQ};
use super::utils::{canonicalize_path, check_required_filename};
use crate::evidence_keying::ReadQualityFilter;

#[derive(Args, Default, Deserialize, Serialize)]
pub struct LinkedCallSettings {
    /// Directory for all cluster-linked command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_linked_output"))]
    pub output_dir: Utf8PathBuf,

    /// Linked read pair evidence file, gzip-compressed or plain text
    ///
    /// Each line describes both reads of one divergent (DIV), parallel (PAR) or unlinked (UL)
    /// read pair. The option may be repeated, in which case all files are combined before
    /// clustering.
    ///
    #[arg(long = "evidence", value_name = "FILE", required = true, num_args = 1..)]
    pub evidence_filenames: Vec<Utf8PathBuf>,

    /// Minimum mapping quality required for both reads of a pair
    #[arg(long, default_value_t = MIN_MAPQ)]
    pub min_mapq: u32,

    /// Maximum mismatch count allowed for either read of a pair
    #[arg(long, default_value_t = MAX_MISMATCHES)]
    pub max_mismatches: u32,

    /// Maximum gap count allowed for either read of a pair
    #[arg(long, default_value_t = MAX_GAP)]
    pub max_gap: u32,

    /// Max distance between the ends of read pair alignments for the pairs to be clustered
    /// together
    ///
    /// The distance is found separately for each read of the pair, as the smallest distance
    /// between any alignment endpoints of the two reads compared.
    ///
    #[arg(long, value_name = "DISTANCE")]
    pub mdist: u64,

    #[arg(hide = true, long)]
    pub disable_path_canonicalization: bool,
}

impl LinkedCallSettings {
    pub fn get_read_quality_filter(&self) -> ReadQualityFilter {
        ReadQualityFilter {
            min_mapq: self.min_mapq,
            max_mismatches: self.max_mismatches,
            max_gap: self.max_gap,
        }
    }
}

pub fn validate_and_fix_linked_call_settings(
    mut settings: LinkedCallSettings,
) -> SimpleResult<LinkedCallSettings> {
    if settings.evidence_filenames.is_empty() {
        bail!("Must specify at least one linked evidence file");
    }

    for filename in settings.evidence_filenames.iter() {
        check_required_filename(filename, "linked evidence")?;
    }

    if !settings.disable_path_canonicalization {
        settings.evidence_filenames = settings
            .evidence_filenames
            .iter()
            .map(|x| canonicalize_path(x))
            .collect::<SimpleResult<Vec<_>>>()?;
    }

    Ok(settings)
}
