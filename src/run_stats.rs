//! Track stats for each clustering run
//!

use std::fs::File;

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, try_with};

use crate::evidence_keying::{AnchorKeyingStats, LinkedKeyingStats};

pub const RUN_STATS_FILENAME: &str = "run.stats.json";

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct LinkedClusterStats {
    pub evidence_type: String,
    pub chrom_pair_count: usize,
    pub evidence_count: usize,
    pub cluster_count: usize,
    pub max_cluster_evidence_count: usize,
}

#[derive(Default, Deserialize, Serialize)]
pub struct LinkedCallRunStats {
    pub keying_stats: LinkedKeyingStats,
    pub cluster_stats: Vec<LinkedClusterStats>,
}

#[derive(Clone, Default, Debug, Deserialize, PartialEq, Serialize)]
pub struct TeClusterStats {
    pub chrom_count: usize,
    pub anchor_count: usize,
    pub plus_cluster_count: usize,
    pub minus_cluster_count: usize,
    pub two_sided_event_count: usize,
    pub plus_only_event_count: usize,
    pub minus_only_event_count: usize,

    /// Events dropped for having fewer supporting reads than the minimum
    pub min_reads_filtered_event_count: usize,
}

impl TeClusterStats {
    pub fn merge(&mut self, other: &Self) {
        self.chrom_count += other.chrom_count;
        self.anchor_count += other.anchor_count;
        self.plus_cluster_count += other.plus_cluster_count;
        self.minus_cluster_count += other.minus_cluster_count;
        self.two_sided_event_count += other.two_sided_event_count;
        self.plus_only_event_count += other.plus_only_event_count;
        self.minus_only_event_count += other.minus_only_event_count;
        self.min_reads_filtered_event_count += other.min_reads_filtered_event_count;
    }
}

#[derive(Default, Deserialize, Serialize)]
pub struct TeCallRunStats {
    pub keying_stats: AnchorKeyingStats,

    /// Count of multi-mapped mate reads hitting a reference TE, if mate filtering was used
    pub te_mate_read_count: Option<usize>,

    pub reference_te_count: Option<usize>,
    pub cluster_stats: TeClusterStats,
}

/// Write run_stats structure out in json format
fn write_run_stats<T: Serialize>(output_dir: &Utf8Path, run_stats: &T) -> SimpleResult<()> {
    let filename = output_dir.join(RUN_STATS_FILENAME);

    info!("Writing run statistics to file: '{filename}'");

    let f = try_with!(
        File::create(&filename),
        "Unable to create run statistics json file: '{}'",
        filename
    );

    try_with!(
        serde_json::to_writer_pretty(&f, run_stats),
        "Unable to write run statistics json file: '{}'",
        filename
    );
    Ok(())
}

pub fn write_linked_call_run_stats(
    output_dir: &Utf8Path,
    run_stats: &LinkedCallRunStats,
) -> SimpleResult<()> {
    write_run_stats(output_dir, run_stats)
}

pub fn write_te_call_run_stats(
    output_dir: &Utf8Path,
    run_stats: &TeCallRunStats,
) -> SimpleResult<()> {
    write_run_stats(output_dir, run_stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_te_cluster_stats_merge() {
        let mut stats = TeClusterStats {
            chrom_count: 1,
            anchor_count: 10,
            plus_cluster_count: 2,
            two_sided_event_count: 1,
            ..Default::default()
        };
        let other = TeClusterStats {
            chrom_count: 1,
            anchor_count: 5,
            minus_cluster_count: 1,
            minus_only_event_count: 1,
            min_reads_filtered_event_count: 3,
            ..Default::default()
        };
        stats.merge(&other);
        assert_eq!(stats.chrom_count, 2);
        assert_eq!(stats.anchor_count, 15);
        assert_eq!(stats.plus_cluster_count, 2);
        assert_eq!(stats.minus_cluster_count, 1);
        assert_eq!(stats.two_sided_event_count, 1);
        assert_eq!(stats.minus_only_event_count, 1);
        assert_eq!(stats.min_reads_filtered_event_count, 3);
    }
}
