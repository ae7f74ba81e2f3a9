//! Write linked clusters to the per-category cluster tables
//!

use std::io::Write;

use camino::Utf8Path;
use itertools::Itertools;
use log::info;
use simple_error::{SimpleResult, try_with};

use crate::cluster_linked::ChromPairClusters;
use crate::evidence::LinkedEvidence;
use crate::gz_utils::{create_gz_writer, finish_gz_writer};

pub const LINKED_CLUSTER_HEADER: &str =
    "id\tchrom1\tcoverage\tstrand1\tstart1\tstop1\tchrom2\tstrand2\tstart2\tstop2\treads";

fn format_member(evidence: &LinkedEvidence) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        evidence.name,
        evidence.range1.start,
        evidence.range1.end,
        evidence.strand1,
        evidence.range2.start,
        evidence.range2.end,
        evidence.strand2
    )
}

/// Write one table row per cluster, with event ids assigned sequentially from 0 over all
/// chromosome pairs
///
/// The strand columns are taken from the first member of each cluster. Returns the number of
/// rows written.
///
pub fn write_linked_clusters(
    writer: &mut impl Write,
    chrom_pair_clusters: &[ChromPairClusters],
) -> std::io::Result<usize> {
    writeln!(writer, "{LINKED_CLUSTER_HEADER}")?;

    let mut event_id = 0;
    for cpc in chrom_pair_clusters.iter() {
        for cluster in cpc.clusters.iter() {
            let (range1, range2) = cluster.get_ranges(&cpc.evidence);
            let first = &cpc.evidence[cluster.members[0]];
            let reads = cluster
                .members
                .iter()
                .map(|&x| format_member(&cpc.evidence[x]))
                .join("|");
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                event_id,
                cpc.chrom_pair.chrom1,
                cluster.evidence_count(),
                first.strand1,
                range1.start,
                range1.end,
                cpc.chrom_pair.chrom2,
                first.strand2,
                range2.start,
                range2.end,
                reads
            )?;
            event_id += 1;
        }
    }
    Ok(event_id)
}

/// Write all clusters of one linked evidence type to a gzipped table
///
pub fn write_linked_cluster_file(
    filename: &Utf8Path,
    chrom_pair_clusters: &[ChromPairClusters],
) -> SimpleResult<()> {
    info!("Writing linked clusters to file: '{filename}'");

    let label = "linked cluster";
    let mut writer = create_gz_writer(filename, label)?;
    try_with!(
        write_linked_clusters(&mut writer, chrom_pair_clusters),
        "Unable to write {} file: '{}'",
        label,
        filename
    );
    finish_gz_writer(writer, label)
}
