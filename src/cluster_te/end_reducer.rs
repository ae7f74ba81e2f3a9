use super::end_cluster::{EndCluster, is_end_cluster_compatible};
use crate::log_utils::debug_msg;

/// Merge single-strand spans until no two spans are within `insert_size`
///
/// Uses the same backward restart scan as linked cluster reduction: cluster `i` is merged into
/// the nearest earlier compatible cluster `j`, after which the scan restarts from the end of the
/// list.
///
pub fn reduce_end_clusters(clusters: &mut Vec<EndCluster>, insert_size: u64) {
    let debug = false;

    if clusters.len() < 2 {
        return;
    }

    let mut i = clusters.len() - 1;
    while i > 0 {
        let merge_target = (0..i)
            .rev()
            .find(|&j| is_end_cluster_compatible(&clusters[i], &clusters[j], insert_size));

        if let Some(j) = merge_target {
            debug_msg!(
                debug,
                "reduce_end_clusters: merging {:?} into {:?}",
                clusters[i],
                clusters[j]
            );
            let absorbed = clusters.remove(i);
            clusters[j].merge(&absorbed);
            i = clusters.len() - 1;
        } else {
            i -= 1;
        }
    }
}

/// Sort reduced spans ascending by position
///
pub fn sort_end_clusters(clusters: &mut [EndCluster]) {
    clusters.sort_by_key(|x| x.range);
}

#[cfg(test)]
mod tests {
    use super::super::end_cluster::test_utils::get_test_end_cluster;
    use super::*;

    fn assert_closure(clusters: &[EndCluster], insert_size: u64) {
        for (i, a) in clusters.iter().enumerate() {
            for b in clusters.iter().skip(i + 1) {
                assert!(!is_end_cluster_compatible(a, b, insert_size));
            }
        }
    }

    #[test]
    fn test_reduce_end_clusters() {
        let insert_size = 300;
        let mut clusters = vec![
            get_test_end_cluster(1000, 1100, 2),
            get_test_end_cluster(1500, 1550, 1),
            get_test_end_cluster(1350, 1400, 3),
            get_test_end_cluster(9000, 9000, 1),
        ];
        reduce_end_clusters(&mut clusters, insert_size);
        sort_end_clusters(&mut clusters);

        assert_eq!(
            clusters,
            vec![
                get_test_end_cluster(1000, 1550, 6),
                get_test_end_cluster(9000, 9000, 1),
            ]
        );
        assert_closure(&clusters, insert_size);
    }

    #[test]
    fn test_reduce_end_clusters_idempotent() {
        let insert_size = 300;
        let mut clusters = vec![
            get_test_end_cluster(1000, 1100, 2),
            get_test_end_cluster(2000, 2000, 1),
            get_test_end_cluster(1350, 1400, 3),
            get_test_end_cluster(1650, 1700, 1),
        ];
        reduce_end_clusters(&mut clusters, insert_size);
        let reduced = clusters.clone();
        reduce_end_clusters(&mut clusters, insert_size);
        assert_eq!(clusters, reduced);
        assert_closure(&clusters, insert_size);

        // All read counts are kept through merging
        let total_reads = clusters.iter().map(|x| x.read_count).sum::<usize>();
        assert_eq!(total_reads, 7);
    }

    #[test]
    fn test_reduce_end_clusters_small_input() {
        let mut clusters = vec![get_test_end_cluster(1000, 1100, 2)];
        reduce_end_clusters(&mut clusters, 300);
        assert_eq!(clusters.len(), 1);

        let mut clusters = Vec::new();
        reduce_end_clusters(&mut clusters, 300);
        assert!(clusters.is_empty());
    }
}
