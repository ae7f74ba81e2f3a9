use super::end_cluster::EndCluster;
use crate::evidence::{EndEvidence, Strand};

/// Split anchor evidence into sorted forward and reverse strand position lists
///
pub fn get_sorted_strand_positions(evidence: &[EndEvidence]) -> (Vec<i64>, Vec<i64>) {
    let (forward, reverse): (Vec<_>, Vec<_>) = evidence
        .iter()
        .partition(|x| x.strand == Strand::Forward);
    let get_sorted_pos = |x: Vec<&EndEvidence>| {
        let mut pos = x.into_iter().map(|e| e.pos).collect::<Vec<_>>();
        pos.sort();
        pos
    };
    (get_sorted_pos(forward), get_sorted_pos(reverse))
}

/// Greedy single-pass clustering of sorted anchor positions from one strand
///
/// Each position extends the first span in list order whose right edge is within
/// `insert_size`, otherwise it starts a new span. This is not necessarily the nearest span.
///
pub fn cluster_strand_positions(sorted_positions: &[i64], insert_size: u64) -> Vec<EndCluster> {
    let mut clusters: Vec<EndCluster> = Vec::new();
    for &pos in sorted_positions.iter() {
        match clusters
            .iter_mut()
            .find(|x| pos.abs_diff(x.range.end) <= insert_size)
        {
            Some(cluster) => cluster.extend_to(pos),
            None => clusters.push(EndCluster::from_pos(pos)),
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::super::end_cluster::test_utils::get_test_end_cluster;
    use super::*;

    #[test]
    fn test_get_sorted_strand_positions() {
        let evidence = [
            EndEvidence {
                pos: 2150,
                strand: Strand::Reverse,
            },
            EndEvidence {
                pos: 1200,
                strand: Strand::Forward,
            },
            EndEvidence {
                pos: 2000,
                strand: Strand::Reverse,
            },
            EndEvidence {
                pos: 1000,
                strand: Strand::Forward,
            },
        ];
        let (forward, reverse) = get_sorted_strand_positions(&evidence);
        assert_eq!(forward, vec![1000, 1200]);
        assert_eq!(reverse, vec![2000, 2150]);
    }

    #[test]
    fn test_cluster_strand_positions() {
        let clusters = cluster_strand_positions(&[1000, 1200], 300);
        assert_eq!(clusters, vec![get_test_end_cluster(1000, 1200, 2)]);

        let clusters = cluster_strand_positions(&[1000, 1200, 1600, 1700, 5000], 300);
        assert_eq!(
            clusters,
            vec![
                get_test_end_cluster(1000, 1200, 2),
                get_test_end_cluster(1600, 1700, 2),
                get_test_end_cluster(5000, 5000, 1),
            ]
        );
    }

    #[test]
    fn test_cluster_strand_positions_threshold() {
        // Repeated positions and a gap exactly at the threshold both extend the span
        let clusters = cluster_strand_positions(&[1000, 1000, 1150], 150);
        assert_eq!(clusters, vec![get_test_end_cluster(1000, 1150, 3)]);

        // Distance is measured from the extended right edge, not the span start
        let clusters = cluster_strand_positions(&[0, 200, 400, 651], 250);
        assert_eq!(
            clusters,
            vec![get_test_end_cluster(0, 400, 3), get_test_end_cluster(651, 651, 1)]
        );
    }

    #[test]
    fn test_cluster_strand_positions_empty() {
        assert!(cluster_strand_positions(&[], 300).is_empty());
    }
}
