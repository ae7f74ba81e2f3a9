use std::collections::HashSet;

use log::info;
use simple_error::SimpleResult;
use thousands::Separable;

use crate::cli;
use crate::cluster_te::process_te_clusters;
use crate::evidence_keying::read_anchor_evidence;
use crate::gz_utils::open_text_reader;
use crate::reference_te::{ReferenceTes, read_te_mate_names};
use crate::run_stats::{TeCallRunStats, write_te_call_run_stats};
use crate::te_output::write_te_event_file;

pub const TE_CLUSTER_FILENAME: &str = "te.clusters.tsv.gz";

/// Load reference TEs if a reference TE file is given
///
/// An empty reference TE file is treated the same as no reference TE file.
///
fn get_reference_tes(settings: &cli::TeCallSettings) -> SimpleResult<Option<ReferenceTes>> {
    let Some(filename) = &settings.ref_te_filename else {
        return Ok(None);
    };
    Ok(get_usable_reference_tes(ReferenceTes::from_file(filename)?))
}

fn get_usable_reference_tes(reference_tes: ReferenceTes) -> Option<ReferenceTes> {
    if reference_tes.is_empty() {
        info!("No intervals found in reference TE file, reference TE annotation is disabled");
        return None;
    }
    info!(
        "Read {} reference TE intervals",
        reference_tes.te_count().separate_with_commas()
    );
    Some(reference_tes)
}

/// Get names of all multi-mapped reads hitting a reference TE, if both reference TEs and the
/// multi-mapped read file are available
///
fn get_te_mate_names(
    settings: &cli::TeCallSettings,
    reference_tes: Option<&ReferenceTes>,
) -> SimpleResult<Option<HashSet<String>>> {
    let (Some(filename), Some(reference_tes)) = (&settings.umm_filename, reference_tes) else {
        return Ok(None);
    };
    info!("Reading multi-mapped reads from file: '{filename}'");
    let reader = open_text_reader(filename, "multi-mapped read")?;
    let te_mate_names = read_te_mate_names(reader, filename.as_str(), reference_tes)?;
    info!(
        "Found {} multi-mapped reads hitting a reference TE",
        te_mate_names.len().separate_with_commas()
    );
    Ok(Some(te_mate_names))
}

pub fn run_te_call(
    shared_settings: &cli::SharedSettings,
    settings: &cli::TeCallSettings,
) -> SimpleResult<()> {
    cli::write_settings(&settings.output_dir, "cluster-te", settings)?;

    let reference_tes = get_reference_tes(settings)?;
    let te_mate_names = get_te_mate_names(settings, reference_tes.as_ref())?;

    let filename = &settings.umu_filename;
    info!("Reading TE anchor reads from file: '{filename}'");
    let reader = open_text_reader(filename, "unique read")?;
    let (keyed_evidence, keying_stats) =
        read_anchor_evidence(reader, filename.as_str(), te_mate_names.as_ref())?;
    info!(
        "Read {} TE anchor reads, {} skipped without a reference TE mate",
        keying_stats.input_record_count.separate_with_commas(),
        keying_stats.non_te_mate_record_count.separate_with_commas()
    );

    let (chrom_events, cluster_stats) = process_te_clusters(
        shared_settings.thread_count,
        keyed_evidence,
        reference_tes.as_ref(),
        &settings.get_cluster_settings(),
    );

    write_te_event_file(&settings.output_dir.join(TE_CLUSTER_FILENAME), &chrom_events)?;

    let run_stats = TeCallRunStats {
        keying_stats,
        te_mate_read_count: te_mate_names.as_ref().map(|x| x.len()),
        reference_te_count: reference_tes.as_ref().map(|x| x.te_count()),
        cluster_stats,
    };
    write_te_call_run_stats(&settings.output_dir, &run_stats)
}
