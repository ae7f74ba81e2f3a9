mod end_cluster;
mod end_clusterer;
mod end_reducer;
mod process_te_clusters;
mod strand_matcher;

pub use end_cluster::EndCluster;
pub use process_te_clusters::*;
#[cfg(test)]
pub use strand_matcher::TeEventCandidate;
