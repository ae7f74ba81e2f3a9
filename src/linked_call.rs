use log::info;
use simple_error::SimpleResult;
use strum::IntoEnumIterator;
use thousands::Separable;

use crate::cli;
use crate::cluster_linked::process_linked_clusters;
use crate::evidence_keying::{LinkedEvidenceKeys, LinkedEvidenceType, read_linked_evidence};
use crate::gz_utils::open_text_reader;
use crate::linked_output::write_linked_cluster_file;
use crate::run_stats::{LinkedCallRunStats, write_linked_call_run_stats};

/// Read linked evidence from all input files, split by evidence type and chromosome pair
///
fn read_all_linked_evidence(
    settings: &cli::LinkedCallSettings,
) -> SimpleResult<LinkedEvidenceKeys> {
    let filter = settings.get_read_quality_filter();
    let mut keys = LinkedEvidenceKeys::default();
    for filename in settings.evidence_filenames.iter() {
        info!("Reading linked evidence from file: '{filename}'");
        let reader = open_text_reader(filename, "linked evidence")?;
        read_linked_evidence(reader, filename.as_str(), &filter, &mut keys)?;
    }

    let stats = &keys.stats;
    info!(
        "Read {} linked evidence records. Filtered {} for read quality and {} as duplicates",
        stats.input_record_count.separate_with_commas(),
        stats.quality_filtered_record_count.separate_with_commas(),
        stats.duplicate_record_count.separate_with_commas()
    );
    for evidence_type in LinkedEvidenceType::iter() {
        info!(
            "Accepted {} {} evidence records",
            keys.get(evidence_type).evidence_count().separate_with_commas(),
            evidence_type.label()
        );
    }
    Ok(keys)
}

pub fn run_linked_call(
    shared_settings: &cli::SharedSettings,
    settings: &cli::LinkedCallSettings,
) -> SimpleResult<()> {
    cli::write_settings(&settings.output_dir, "cluster-linked", settings)?;

    let mut keys = read_all_linked_evidence(settings)?;

    let mut run_stats = LinkedCallRunStats {
        keying_stats: keys.stats.clone(),
        ..Default::default()
    };

    for evidence_type in LinkedEvidenceType::iter() {
        let keyed_evidence = keys.take_evidence(evidence_type);
        let (chrom_pair_clusters, cluster_stats) = process_linked_clusters(
            shared_settings.thread_count,
            evidence_type,
            keyed_evidence,
            settings.mdist,
        );

        let filename = settings
            .output_dir
            .join(format!("{}.clusters.tsv.gz", evidence_type.label()));
        write_linked_cluster_file(&filename, &chrom_pair_clusters)?;
        run_stats.cluster_stats.push(cluster_stats);
    }

    write_linked_call_run_stats(&settings.output_dir, &run_stats)
}
