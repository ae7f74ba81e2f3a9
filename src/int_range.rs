use std::fmt;

/// A simple type for closed integer ranges
///
/// Ranges here follow the convention of the intermediate evidence files: each range is the
/// [start,end] pair of an aligned read (or a cluster span), and both ends are included.
///
/// This struct is used instead of the native rust RangeInclusive type just to focus on the
/// specific goals of evidence interval comparison.
///
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct IntRange {
    pub start: i64,
    pub end: i64,
}

impl IntRange {
    pub fn from_int(pos: i64) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn from_pair(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Return true if pos intersects range, both range ends included
    ///
    pub fn intersect_pos(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }

    pub fn merge(&mut self, other: &IntRange) {
        if other.start < self.start {
            self.start = other.start;
        }
        if other.end > self.end {
            self.end = other.end;
        }
    }
}

impl fmt::Debug for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

/// Get the endpoint distance between 2 ranges
///
/// This is the smallest absolute difference between any endpoint of `ir1` and any endpoint of
/// `ir2`. It is not an interval distance: two overlapping ranges with distant ends still report
/// the gap between their closest pair of ends.
///
///    [---------]       [-----------]
///    s1       e1       s2         e2
///              |-------|
///             endpoint dist
///
pub fn get_endpoint_distance(ir1: &IntRange, ir2: &IntRange) -> u64 {
    [
        ir1.start.abs_diff(ir2.start),
        ir1.start.abs_diff(ir2.end),
        ir1.end.abs_diff(ir2.end),
        ir1.end.abs_diff(ir2.start),
    ]
    .into_iter()
    .min()
    .unwrap_or_default()
}
