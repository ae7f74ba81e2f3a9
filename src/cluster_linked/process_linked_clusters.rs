use std::collections::BTreeMap;

use log::info;
use thousands::Separable;

use super::cluster_reducer::{reduce_linked_clusters, sort_linked_clusters};
use super::linked_cluster::LinkedCluster;
use super::pair_clusterer::{cluster_linked_evidence, sort_linked_evidence};
use crate::evidence::LinkedEvidence;
use crate::evidence_keying::{ChromPair, LinkedEvidenceType};
use crate::key_worker_pool::process_keys_in_parallel;
use crate::log_utils::debug_msg;
use crate::run_stats::LinkedClusterStats;

/// Final linked clusters for one chromosome pair
///
/// Cluster members index into `evidence`, which is stored in clustering order.
///
pub struct ChromPairClusters {
    pub chrom_pair: ChromPair,
    pub evidence: Vec<LinkedEvidence>,
    pub clusters: Vec<LinkedCluster>,
}

/// Sort, cluster and reduce all linked evidence from one chromosome pair
///
pub fn cluster_chrom_pair_evidence(
    chrom_pair: ChromPair,
    mut evidence: Vec<LinkedEvidence>,
    mdist: u64,
) -> ChromPairClusters {
    let debug = false;

    sort_linked_evidence(&mut evidence);
    let mut clusters = cluster_linked_evidence(&evidence, mdist);
    let unreduced_count = clusters.len();
    reduce_linked_clusters(&mut clusters, &evidence, mdist);
    sort_linked_clusters(&mut clusters, &evidence);
    debug_msg!(
        debug,
        "cluster_chrom_pair_evidence: {}: {} evidence records, {} clusters reduced to {}",
        chrom_pair,
        evidence.len(),
        unreduced_count,
        clusters.len()
    );
    ChromPairClusters {
        chrom_pair,
        evidence,
        clusters,
    }
}

/// Cluster linked evidence of one type over all chromosome pairs
///
/// Returns clusters for each chromosome pair in chromosome pair order
///
pub fn process_linked_clusters(
    thread_count: usize,
    evidence_type: LinkedEvidenceType,
    keyed_evidence: BTreeMap<ChromPair, Vec<LinkedEvidence>>,
    mdist: u64,
) -> (Vec<ChromPairClusters>, LinkedClusterStats) {
    let mut stats = LinkedClusterStats {
        evidence_type: evidence_type.label().to_string(),
        chrom_pair_count: keyed_evidence.len(),
        evidence_count: keyed_evidence.values().map(|x| x.len()).sum(),
        ..Default::default()
    };

    info!(
        "Clustering {} {} evidence records from {} chromosome pairs",
        stats.evidence_count.separate_with_commas(),
        evidence_type.label(),
        stats.chrom_pair_count
    );

    let chrom_pair_clusters = process_keys_in_parallel(
        thread_count,
        keyed_evidence.into_iter().collect(),
        |chrom_pair, evidence| cluster_chrom_pair_evidence(chrom_pair, evidence, mdist),
    );

    for cpc in chrom_pair_clusters.iter() {
        stats.cluster_count += cpc.clusters.len();
        let max_count = cpc.clusters.iter().map(|x| x.evidence_count()).max();
        stats.max_cluster_evidence_count =
            std::cmp::max(stats.max_cluster_evidence_count, max_count.unwrap_or(0));
    }

    info!(
        "Finished clustering {} evidence into {} clusters",
        evidence_type.label(),
        stats.cluster_count.separate_with_commas()
    );

    (chrom_pair_clusters, stats)
}

#[cfg(test)]
mod tests {
    use super::super::linked_cluster::test_utils::get_test_evidence;
    use super::*;

    fn get_key(chrom: &str) -> ChromPair {
        ChromPair {
            chrom1: chrom.to_string(),
            chrom2: chrom.to_string(),
        }
    }

    #[test]
    fn test_cluster_chrom_pair_evidence_ordering() {
        // Input out of order, with the far singleton first:
        let evidence = vec![
            get_test_evidence("e3", (50000, 50050), (60000, 60050), (0, 1)),
            get_test_evidence("e2", (120, 160), (5010, 5060), (0, 1)),
            get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1)),
        ];
        let result = cluster_chrom_pair_evidence(get_key("chr1"), evidence, 500);
        assert_eq!(result.clusters.len(), 2);

        let c0 = &result.clusters[0];
        assert_eq!(c0.evidence_count(), 2);
        let names = c0
            .members
            .iter()
            .map(|&x| result.evidence[x].name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["e1", "e2"]);

        // Strictly ascending cluster order:
        let keys = result
            .clusters
            .iter()
            .map(|x| x.get_order_key(&result.evidence))
            .collect::<Vec<_>>();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_process_linked_clusters() {
        let mut keyed_evidence = BTreeMap::new();
        keyed_evidence.insert(
            get_key("chr2"),
            vec![
                get_test_evidence("a1", (100, 150), (5000, 5050), (0, 0)),
                get_test_evidence("a2", (120, 160), (5010, 5060), (0, 0)),
                get_test_evidence("a3", (130, 170), (5020, 5070), (0, 0)),
            ],
        );
        keyed_evidence.insert(
            get_key("chr1"),
            vec![get_test_evidence("b1", (100, 150), (5000, 5050), (1, 1))],
        );

        let (result, stats) =
            process_linked_clusters(2, LinkedEvidenceType::Parallel, keyed_evidence, 500);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].chrom_pair, get_key("chr1"));
        assert_eq!(result[1].chrom_pair, get_key("chr2"));
        assert_eq!(stats.evidence_type, "par");
        assert_eq!(stats.chrom_pair_count, 2);
        assert_eq!(stats.evidence_count, 4);
        assert_eq!(stats.cluster_count, 2);
        assert_eq!(stats.max_cluster_evidence_count, 3);
    }
}
