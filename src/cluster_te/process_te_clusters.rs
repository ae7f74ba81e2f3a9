use log::info;
use thousands::Separable;

use super::end_clusterer::{cluster_strand_positions, get_sorted_strand_positions};
use super::end_reducer::{reduce_end_clusters, sort_end_clusters};
use super::strand_matcher::{TeEventCandidate, match_strand_clusters};
use crate::evidence::EndEvidence;
use crate::evidence_keying::KeyedEndEvidence;
use crate::key_worker_pool::process_keys_in_parallel;
use crate::reference_te::{ReferenceTes, TeSideAnnotation, annotate_minus_side, annotate_plus_side};
use crate::run_stats::TeClusterStats;

pub struct TeClusterSettings {
    /// Copied from cli settings
    pub insert_size: u64,

    /// Max distance from plus span end to minus span start for the spans to be paired into one
    /// event
    pub match_distance: u64,

    /// Events supported by fewer reads over both sides are dropped
    pub min_read_count: usize,
}

/// A TE event candidate with its reference TE annotation
///
/// The annotation of an absent side is left as unknown
///
#[derive(Clone, Debug, PartialEq)]
pub struct TeEvent {
    pub candidate: TeEventCandidate,
    pub plus_annotation: TeSideAnnotation,
    pub minus_annotation: TeSideAnnotation,
}

pub struct ChromTeEvents {
    pub chrom: String,
    pub events: Vec<TeEvent>,
}

/// Cluster anchors from one chromosome into TE event candidates
///
fn cluster_chrom_anchor_evidence(
    evidence: &[EndEvidence],
    settings: &TeClusterSettings,
    stats: &mut TeClusterStats,
) -> Vec<TeEventCandidate> {
    let (forward, reverse) = get_sorted_strand_positions(evidence);

    let get_strand_clusters = |positions: &[i64]| {
        let mut clusters = cluster_strand_positions(positions, settings.insert_size);
        reduce_end_clusters(&mut clusters, settings.insert_size);
        sort_end_clusters(&mut clusters);
        clusters
    };

    let plus_clusters = get_strand_clusters(&forward);
    let minus_clusters = get_strand_clusters(&reverse);
    stats.plus_cluster_count += plus_clusters.len();
    stats.minus_cluster_count += minus_clusters.len();

    match_strand_clusters(&plus_clusters, minus_clusters, settings.match_distance)
}

fn process_chrom_te_clusters(
    chrom: String,
    evidence: Vec<EndEvidence>,
    reference_tes: Option<&ReferenceTes>,
    settings: &TeClusterSettings,
) -> (ChromTeEvents, TeClusterStats) {
    let mut stats = TeClusterStats {
        chrom_count: 1,
        anchor_count: evidence.len(),
        ..Default::default()
    };

    let candidates = cluster_chrom_anchor_evidence(&evidence, settings, &mut stats);

    let mut events = Vec::new();
    for candidate in candidates {
        if candidate.read_count() < settings.min_read_count {
            stats.min_reads_filtered_event_count += 1;
            continue;
        }

        match (candidate.plus.is_some(), candidate.minus.is_some()) {
            (true, true) => stats.two_sided_event_count += 1,
            (true, false) => stats.plus_only_event_count += 1,
            _ => stats.minus_only_event_count += 1,
        }

        let plus_annotation = candidate
            .plus
            .map(|x| annotate_plus_side(reference_tes, &chrom, &x))
            .unwrap_or_default();
        let minus_annotation = candidate
            .minus
            .map(|x| annotate_minus_side(reference_tes, &chrom, &x))
            .unwrap_or_default();
        events.push(TeEvent {
            candidate,
            plus_annotation,
            minus_annotation,
        });
    }

    (ChromTeEvents { chrom, events }, stats)
}

/// Cluster TE anchor evidence from all chromosomes into annotated TE events
///
/// Returns events for each chromosome in chromosome order
///
/// * `reference_tes` - reference TE intervals used to annotate events, if available
///
pub fn process_te_clusters(
    thread_count: usize,
    keyed_evidence: KeyedEndEvidence,
    reference_tes: Option<&ReferenceTes>,
    settings: &TeClusterSettings,
) -> (Vec<ChromTeEvents>, TeClusterStats) {
    let anchor_count = keyed_evidence.values().map(|x| x.len()).sum::<usize>();
    info!(
        "Clustering {} TE anchor reads from {} chromosomes",
        anchor_count.separate_with_commas(),
        keyed_evidence.len()
    );

    let results = process_keys_in_parallel(
        thread_count,
        keyed_evidence.into_iter().collect(),
        |chrom, evidence| process_chrom_te_clusters(chrom, evidence, reference_tes, settings),
    );

    let mut stats = TeClusterStats::default();
    let chrom_events = results
        .into_iter()
        .map(|(chrom_events, chrom_stats)| {
            stats.merge(&chrom_stats);
            chrom_events
        })
        .collect::<Vec<_>>();

    info!(
        "Finished clustering TE anchors into {} events ({} two-sided)",
        (stats.two_sided_event_count + stats.plus_only_event_count + stats.minus_only_event_count)
            .separate_with_commas(),
        stats.two_sided_event_count.separate_with_commas()
    );

    (chrom_events, stats)
}
