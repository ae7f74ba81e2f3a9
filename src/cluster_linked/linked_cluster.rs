use std::fmt;

use crate::evidence::LinkedEvidence;
use crate::int_range::{IntRange, get_endpoint_distance};

/// A cluster of linked evidence believed to arise from the same event
///
/// Members are stored as indices into the evidence list of the chromosome pair being clustered.
/// The cluster ranges are not stored, they are found from the members on demand.
///
#[derive(Clone, Eq, PartialEq)]
pub struct LinkedCluster {
    pub members: Vec<usize>,
}

impl LinkedCluster {
    pub fn from_evidence_index(evidence_index: usize) -> Self {
        Self {
            members: vec![evidence_index],
        }
    }

    pub fn evidence_count(&self) -> usize {
        self.members.len()
    }

    /// Get the range spanned by all member evidence on each side of the cluster
    ///
    /// Member ranges are used as stored, so mirrored members contribute their first range to
    /// range1 like every other member.
    ///
    pub fn get_ranges(&self, evidence: &[LinkedEvidence]) -> (IntRange, IntRange) {
        let first = &evidence[self.members[0]];
        let mut range1 = first.range1;
        let mut range2 = first.range2;
        for &member_index in self.members.iter().skip(1) {
            let member = &evidence[member_index];
            range1.merge(&member.range1);
            range2.merge(&member.range2);
        }
        (range1, range2)
    }

    /// Key used to put clusters into their output order
    ///
    pub fn get_order_key(&self, evidence: &[LinkedEvidence]) -> (i64, i64) {
        let (range1, range2) = self.get_ranges(evidence);
        (range1.start, range2.start)
    }
}

impl fmt::Debug for LinkedCluster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinkedCluster members: {:?}", self.members)
    }
}

/// Test whether two evidence records support the same event
///
/// The records must have the same strand pair, or the same strand pair with the two reads
/// swapped. In the swapped case each range of `a` is compared with the opposite range of `b`.
/// Both range comparisons must be within `mdist`.
///
pub fn is_evidence_compatible(a: &LinkedEvidence, b: &LinkedEvidence, mdist: u64) -> bool {
    let is_close =
        |a1: &IntRange, b1: &IntRange, a2: &IntRange, b2: &IntRange| -> bool {
            get_endpoint_distance(a1, b1) <= mdist && get_endpoint_distance(a2, b2) <= mdist
        };

    if a.strand1 == b.strand1 && a.strand2 == b.strand2 {
        is_close(&a.range1, &b.range1, &a.range2, &b.range2)
    } else if a.strand1 == b.strand2 && a.strand2 == b.strand1 {
        is_close(&a.range1, &b.range2, &a.range2, &b.range1)
    } else {
        false
    }
}

/// Test whether `candidate` is compatible with any member of `cluster`
///
pub fn is_cluster_compatible(
    candidate: &LinkedEvidence,
    cluster: &LinkedCluster,
    evidence: &[LinkedEvidence],
    mdist: u64,
) -> bool {
    cluster
        .members
        .iter()
        .any(|&member_index| is_evidence_compatible(candidate, &evidence[member_index], mdist))
}

#[cfg(test)]
pub mod test_utils {
    use crate::evidence::{LinkedEvidence, Strand};
    use crate::int_range::IntRange;

    pub fn get_test_evidence(
        name: &str,
        range1: (i64, i64),
        range2: (i64, i64),
        strands: (u8, u8),
    ) -> LinkedEvidence {
        LinkedEvidence {
            range1: IntRange::from_pair(range1.0, range1.1),
            range2: IntRange::from_pair(range2.0, range2.1),
            strand1: Strand::from_repr(strands.0).unwrap(),
            strand2: Strand::from_repr(strands.1).unwrap(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::get_test_evidence;
    use super::*;

    #[test]
    fn test_is_evidence_compatible() {
        let e1 = get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1));
        let e2 = get_test_evidence("e2", (120, 160), (5010, 5060), (0, 1));
        let e3 = get_test_evidence("e3", (50000, 50050), (60000, 60050), (0, 1));
        assert!(is_evidence_compatible(&e1, &e2, 500));
        assert!(!is_evidence_compatible(&e1, &e3, 500));

        // Only one side in range:
        let e4 = get_test_evidence("e4", (120, 160), (7000, 7050), (0, 1));
        assert!(!is_evidence_compatible(&e1, &e4, 500));
    }

    #[test]
    fn test_is_evidence_compatible_strands() {
        let e1 = get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1));

        // Mirrored orientation, compared with swapped ranges:
        let e2 = get_test_evidence("e2", (5010, 5060), (120, 160), (1, 0));
        assert!(is_evidence_compatible(&e1, &e2, 500));
        assert!(is_evidence_compatible(&e2, &e1, 500));

        // Mirrored orientation without swapped ranges is too far apart:
        let e3 = get_test_evidence("e3", (120, 160), (5010, 5060), (1, 0));
        assert!(!is_evidence_compatible(&e1, &e3, 500));

        // Different strand pair:
        let e4 = get_test_evidence("e4", (100, 150), (5000, 5050), (0, 0));
        assert!(!is_evidence_compatible(&e1, &e4, 500));
    }

    #[test]
    fn test_get_ranges() {
        let evidence = vec![
            get_test_evidence("e1", (100, 150), (5000, 5050), (0, 1)),
            get_test_evidence("e2", (120, 160), (5010, 5060), (0, 1)),
        ];
        let cluster = LinkedCluster {
            members: vec![0, 1],
        };
        let (range1, range2) = cluster.get_ranges(&evidence);
        assert_eq!(range1, IntRange::from_pair(100, 160));
        assert_eq!(range2, IntRange::from_pair(5000, 5060));
        assert_eq!(cluster.get_order_key(&evidence), (100, 5000));
    }
}
