mod cluster_reducer;
mod linked_cluster;
mod pair_clusterer;
mod process_linked_clusters;

#[cfg(test)]
pub use linked_cluster::LinkedCluster;
pub use process_linked_clusters::*;
