use super::end_cluster::EndCluster;
use crate::log_utils::debug_msg;

/// A candidate TE insertion, supported by anchors on one or both sides of the insertion point
///
/// The plus side holds forward strand anchors upstream of the insertion, the minus side holds
/// reverse strand anchors downstream of it. At least one side is always present.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeEventCandidate {
    pub plus: Option<EndCluster>,
    pub minus: Option<EndCluster>,
}

impl TeEventCandidate {
    fn from_plus(plus: EndCluster) -> Self {
        Self {
            plus: Some(plus),
            minus: None,
        }
    }

    fn from_minus(minus: EndCluster) -> Self {
        Self {
            plus: None,
            minus: Some(minus),
        }
    }

    pub fn read_count(&self) -> usize {
        self.plus.map(|x| x.read_count).unwrap_or(0) + self.minus.map(|x| x.read_count).unwrap_or(0)
    }
}

/// Get the gap from the end of the plus span to the start of the minus span, if the minus span
/// starts downstream of the plus span end within `match_distance`
///
fn get_match_gap(plus: &EndCluster, minus: &EndCluster, match_distance: u64) -> Option<u64> {
    if minus.range.start < plus.range.end {
        return None;
    }
    let gap = minus.range.start.abs_diff(plus.range.end);
    (gap <= match_distance).then_some(gap)
}

/// Find the index in `candidates` where a minus-only candidate should be inserted
///
/// The minus span is placed before the first candidate with a plus side starting after it, or
/// with a minus side starting after it.
///
fn get_minus_only_insert_index(candidates: &[TeEventCandidate], minus: &EndCluster) -> usize {
    let start = minus.range.start;
    candidates
        .iter()
        .position(|c| {
            c.plus.is_some_and(|x| start < x.range.start)
                || c.minus.is_some_and(|x| start < x.range.start)
        })
        .unwrap_or(candidates.len())
}

/// Pair plus and minus strand spans from one chromosome into TE event candidates
///
/// Both span lists should be sorted ascending. Matching is greedy: each unmatched plus span in
/// order claims the first minus span downstream of it within `match_distance`, unless a later
/// unmatched plus span is strictly closer to that minus span, in which case the later plus span
/// takes the match and the current one is reported alone. A minus span is never matched to more
/// than one plus span.
///
/// Unmatched minus spans are inserted into the candidate list by start position.
///
pub fn match_strand_clusters(
    plus_clusters: &[EndCluster],
    mut minus_clusters: Vec<EndCluster>,
    match_distance: u64,
) -> Vec<TeEventCandidate> {
    let debug = false;

    let mut candidates = Vec::new();
    let mut is_plus_matched = vec![false; plus_clusters.len()];
    for plus_index in 0..plus_clusters.len() {
        if is_plus_matched[plus_index] {
            continue;
        }
        is_plus_matched[plus_index] = true;
        let plus = &plus_clusters[plus_index];

        let minus_match = minus_clusters.iter().enumerate().find_map(|(minus_index, minus)| {
            get_match_gap(plus, minus, match_distance).map(|gap| (minus_index, gap))
        });

        let Some((minus_index, gap)) = minus_match else {
            candidates.push(TeEventCandidate::from_plus(*plus));
            continue;
        };

        let minus = minus_clusters.remove(minus_index);
        let mut winner = (plus_index, gap);
        for (later_index, later_plus) in plus_clusters.iter().enumerate().skip(plus_index + 1) {
            if is_plus_matched[later_index] {
                continue;
            }
            if let Some(later_gap) = get_match_gap(later_plus, &minus, match_distance) {
                if later_gap < winner.1 {
                    winner = (later_index, later_gap);
                }
            }
        }

        let (winner_index, _) = winner;
        is_plus_matched[winner_index] = true;
        candidates.push(TeEventCandidate {
            plus: Some(plus_clusters[winner_index]),
            minus: Some(minus),
        });
        if winner_index != plus_index {
            debug_msg!(
                debug,
                "match_strand_clusters: plus span {:?} loses {:?} to closer plus span {:?}",
                plus,
                minus,
                plus_clusters[winner_index]
            );
            candidates.push(TeEventCandidate::from_plus(*plus));
        }
    }

    for minus in minus_clusters {
        let insert_index = get_minus_only_insert_index(&candidates, &minus);
        candidates.insert(insert_index, TeEventCandidate::from_minus(minus));
    }

    candidates
}
