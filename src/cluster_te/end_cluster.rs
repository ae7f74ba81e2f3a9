use std::fmt;

use crate::int_range::{IntRange, get_endpoint_distance};

/// Span of single-strand anchor positions and the number of reads supporting it
///
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct EndCluster {
    pub range: IntRange,
    pub read_count: usize,
}

impl EndCluster {
    pub fn from_pos(pos: i64) -> Self {
        Self {
            range: IntRange::from_int(pos),
            read_count: 1,
        }
    }

    /// Extend the right edge of the span to a new downstream read position
    ///
    pub fn extend_to(&mut self, pos: i64) {
        debug_assert!(pos >= self.range.end);
        self.range.end = pos;
        self.read_count += 1;
    }

    /// Absorb `other` into this cluster
    ///
    pub fn merge(&mut self, other: &Self) {
        self.range.merge(&other.range);
        self.read_count += other.read_count;
    }
}

impl fmt::Debug for EndCluster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EndCluster {:?} reads: {}", self.range, self.read_count)
    }
}

/// Test whether two spans are close enough to describe the same TE junction
///
pub fn is_end_cluster_compatible(a: &EndCluster, b: &EndCluster, insert_size: u64) -> bool {
    get_endpoint_distance(&a.range, &b.range) <= insert_size
}


#[cfg(test)]
mod tests {
    use super::test_utils::get_test_end_cluster;
    use super::*;

    #[test]
    fn test_extend_and_merge() {
        let mut c = EndCluster::from_pos(1000);
        c.extend_to(1200);
        assert_eq!(c, get_test_end_cluster(1000, 1200, 2));

        c.merge(&get_test_end_cluster(900, 1100, 3));
        assert_eq!(c, get_test_end_cluster(900, 1200, 5));
    }

    #[test]
    fn test_is_end_cluster_compatible() {
        let a = get_test_end_cluster(1000, 1200, 2);
        assert!(is_end_cluster_compatible(
            &a,
            &get_test_end_cluster(1500, 1600, 1),
            300
        ));
        assert!(!is_end_cluster_compatible(
            &a,
            &get_test_end_cluster(1501, 1600, 1),
            300
        ));
    }
}
