use super::linked_cluster::{LinkedCluster, is_cluster_compatible};
use crate::evidence::LinkedEvidence;
use crate::log_utils::debug_msg;

/// Merge linked clusters until no two clusters are compatible
///
/// Clusters are scanned from the back of the list. Whenever any member of cluster `i` is
/// compatible with an earlier cluster `j`, cluster `i` is appended into `j` and removed, and
/// the scan restarts from the new end of the list.
///
/// On return no pair of clusters in `clusters` contains a compatible pair of evidence records.
///
pub fn reduce_linked_clusters(
    clusters: &mut Vec<LinkedCluster>,
    evidence: &[LinkedEvidence],
    mdist: u64,
) {
    let debug = false;

    if clusters.len() < 2 {
        return;
    }

    let mut i = clusters.len() - 1;
    while i > 0 {
        let merge_target = {
            let cluster_i = &clusters[i];
            (0..i).rev().find(|&j| {
                cluster_i.members.iter().any(|&member_index| {
                    is_cluster_compatible(&evidence[member_index], &clusters[j], evidence, mdist)
                })
            })
        };

        if let Some(j) = merge_target {
            debug_msg!(debug, "reduce_linked_clusters: merging cluster {i} into {j}");
            let absorbed = clusters.remove(i);
            clusters[j].members.extend(absorbed.members);
            i = clusters.len() - 1;
        } else {
            i -= 1;
        }
    }
}

/// Sort reduced clusters into output order, ascending by the minimum start of each cluster side
///
pub fn sort_linked_clusters(clusters: &mut [LinkedCluster], evidence: &[LinkedEvidence]) {
    clusters.sort_by_cached_key(|x| x.get_order_key(evidence));
}
