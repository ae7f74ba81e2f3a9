use super::linked_cluster::{LinkedCluster, is_cluster_compatible};
use crate::evidence::LinkedEvidence;
use crate::log_utils::debug_msg;

/// Sort linked evidence into the order required for clustering
///
/// Cluster assignment depends on evidence order, so this order has to be total over the
/// clustering fields. The sort is stable, so evidence identical in all sort fields keeps its
/// input order.
///
pub fn sort_linked_evidence(evidence: &mut [LinkedEvidence]) {
    evidence.sort_by_key(|x| x.sort_key());
}

/// Greedy single-pass clustering of linked evidence from one chromosome pair
///
/// Each evidence record is added to the first existing cluster (in creation order) containing
/// any compatible member, or else starts a new cluster.
///
/// The result depends on input order, so `evidence` is expected to already be sorted by
/// [sort_linked_evidence]. Clusters which should be merged but were split by the arrival order
/// of their evidence are left for the reduction step.
///
pub fn cluster_linked_evidence(evidence: &[LinkedEvidence], mdist: u64) -> Vec<LinkedCluster> {
    let debug = false;

    let mut clusters: Vec<LinkedCluster> = Vec::new();
    for (evidence_index, candidate) in evidence.iter().enumerate() {
        let target_cluster_index = clusters
            .iter()
            .position(|cluster| is_cluster_compatible(candidate, cluster, evidence, mdist));
        match target_cluster_index {
            Some(cluster_index) => {
                clusters[cluster_index].members.push(evidence_index);
            }
            None => {
                debug_msg!(
                    debug,
                    "cluster_linked_evidence: starting cluster {} from evidence {:?}",
                    clusters.len(),
                    candidate
                );
                clusters.push(LinkedCluster::from_evidence_index(evidence_index));
            }
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::super::linked_cluster::test_utils::get_test_evidence;
    use super::*;
    use crate::int_range::IntRange;

    #[test]
    fn test_sort_linked_evidence() {
        let mut evidence = vec![
            get_test_evidence("a", (300, 350), (900, 950), (0, 1)),
            get_test_evidence("b", (100, 150), (900, 950), (1, 0)),
            get_test_evidence("c", (100, 150), (800, 850), (0, 1)),
            get_test_evidence("d", (100, 150), (900, 950), (0, 1)),
        ];
        sort_linked_evidence(&mut evidence);
        let names = evidence.iter().map(|x| x.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["c", "d", "b", "a"]);
    }

    #[test]
    fn test_cluster_linked_evidence_scenario() {
        let evidence = vec![
            get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1)),
            get_test_evidence("e2", (120, 160), (5010, 5060), (0, 1)),
            get_test_evidence("e3", (50000, 50050), (60000, 60050), (0, 1)),
        ];
        let clusters = cluster_linked_evidence(&evidence, 500);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 1]);
        assert_eq!(clusters[1].members, vec![2]);

        let (range1, range2) = clusters[0].get_ranges(&evidence);
        assert_eq!(range1, IntRange::from_pair(100, 160));
        assert_eq!(range2, IntRange::from_pair(5000, 5060));
    }

    #[test]
    fn test_cluster_linked_evidence_empty() {
        assert!(cluster_linked_evidence(&[], 500).is_empty());
    }

    #[test]
    fn test_cluster_linked_evidence_first_cluster_wins() {
        // e3 is compatible with both e1's and e2's clusters, it should join the first one
        let evidence = vec![
            get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1)),
            get_test_evidence("e2", (1000, 1050), (5900, 5950), (0, 1)),
            get_test_evidence("e3", (550, 600), (5450, 5500), (0, 1)),
        ];
        let clusters = cluster_linked_evidence(&evidence, 500);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 2]);
        assert_eq!(clusters[1].members, vec![1]);
    }

    #[test]
    fn test_cluster_linked_evidence_separates_strand_pairs() {
        let evidence = vec![
            get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1)),
            get_test_evidence("e2", (110, 160), (5010, 5060), (0, 0)),
            get_test_evidence("e3", (120, 170), (5020, 5070), (1, 1)),
        ];
        let clusters = cluster_linked_evidence(&evidence, 500);
        assert_eq!(clusters.len(), 3);
    }
}
