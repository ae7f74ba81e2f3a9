//! Known reference TE intervals and TE event annotation against them
//!

use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use bio::data_structures::interval_tree::IntervalTree;
use camino::Utf8Path;
use log::info;
use simple_error::{SimpleResult, bail, try_with};

use crate::cluster_te::EndCluster;
use crate::evidence_keying::for_each_anchor_record;
use crate::gz_utils::open_text_reader;
use crate::int_range::IntRange;

/// Reference TE intervals from one chromosome
///
pub struct ChromReferenceTes {
    /// Closed 0-based intervals sorted by start
    intervals: Vec<IntRange>,

    /// The same intervals, stored half-open for containment queries
    regions: IntervalTree<i64, ()>,
}

impl ChromReferenceTes {
    fn new(mut intervals: Vec<IntRange>) -> Self {
        intervals.sort_by_key(|x| x.start);
        let mut regions = IntervalTree::new();
        for interval in intervals.iter() {
            regions.insert(interval.start..(interval.end + 1), ());
        }
        Self { intervals, regions }
    }

    /// Return true if `pos` is inside any reference TE
    ///
    pub fn contains_pos(&self, pos: i64) -> bool {
        self.regions.find(pos..(pos + 1)).next().is_some()
    }

    /// Return true if either end of `range` is inside any reference TE
    ///
    pub fn contains_either_end(&self, range: &IntRange) -> bool {
        self.contains_pos(range.start) || self.contains_pos(range.end)
    }

    /// Find the first reference TE, scanning by ascending start, which contains `pos` or starts
    /// at or after it
    ///
    pub fn find_first_te_from(&self, pos: i64) -> Option<&IntRange> {
        self.intervals
            .iter()
            .find(|x| x.start >= pos || x.intersect_pos(pos))
    }

    /// Find the first reference TE, scanning by descending start, which contains `pos` or starts
    /// at or before it
    ///
    pub fn find_first_te_to(&self, pos: i64) -> Option<&IntRange> {
        self.intervals
            .iter()
            .rev()
            .find(|x| x.start <= pos || x.intersect_pos(pos))
    }
}

/// All reference TE intervals, by chromosome
///
#[derive(Default)]
pub struct ReferenceTes {
    chroms: HashMap<String, ChromReferenceTes>,
}

impl ReferenceTes {
    /// Read reference TEs in `chrom start stop` format with 1-based closed coordinates
    ///
    /// Blank lines and lines starting with '#' are skipped.
    ///
    pub fn from_reader(reader: impl BufRead, label: &str) -> SimpleResult<Self> {
        let mut chrom_intervals: HashMap<String, Vec<IntRange>> = HashMap::new();
        for (line_index, line) in reader.lines().enumerate() {
            let line = try_with!(line, "Can't read line {} of {}", line_index + 1, label);
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (chrom, interval) = try_with!(
                parse_reference_te_line(line),
                "Invalid record at line {} of {}",
                line_index + 1,
                label
            );
            chrom_intervals.entry(chrom).or_default().push(interval);
        }

        let chroms = chrom_intervals
            .into_iter()
            .map(|(chrom, intervals)| (chrom, ChromReferenceTes::new(intervals)))
            .collect();
        Ok(Self { chroms })
    }

    pub fn from_file(filename: &Utf8Path) -> SimpleResult<Self> {
        info!("Reading reference TE intervals from file: '{filename}'");
        let label = "reference TE";
        let reader = open_text_reader(filename, label)?;
        Self::from_reader(reader, filename.as_str())
    }

    pub fn get_chrom(&self, chrom: &str) -> Option<&ChromReferenceTes> {
        self.chroms.get(chrom)
    }

    pub fn te_count(&self) -> usize {
        self.chroms.values().map(|x| x.intervals.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.te_count() == 0
    }
}

fn parse_reference_te_line(line: &str) -> SimpleResult<(String, IntRange)> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    if words.len() < 3 {
        bail!(
            "Expected 3 fields in reference TE record but found {}",
            words.len()
        );
    }
    let parse_pos = |index: usize| -> SimpleResult<i64> {
        match words[index].parse::<i64>() {
            Ok(x) if x >= 1 => Ok(x - 1),
            _ => bail!("Invalid reference TE position '{}'", words[index]),
        }
    };
    let start = parse_pos(1)?;
    let end = parse_pos(2)?;
    if end < start {
        bail!(
            "Reference TE stop '{}' is less than start '{}'",
            words[2],
            words[1]
        );
    }
    Ok((words[0].to_string(), IntRange::from_pair(start, end)))
}

/// Read the multi-mapped read file and find all read names with an alignment hitting a reference
/// TE
///
/// An alignment hits a reference TE if its start or stop is inside a reference TE on the same
/// chromosome.
///
pub fn read_te_mate_names(
    reader: impl BufRead,
    label: &str,
    reference_tes: &ReferenceTes,
) -> SimpleResult<HashSet<String>> {
    let mut te_mate_names = HashSet::new();
    for_each_anchor_record(reader, label, false, |record| {
        if te_mate_names.contains(&record.name) {
            return Ok(());
        }
        if let Some(chrom_tes) = reference_tes.get_chrom(&record.chrom) {
            if chrom_tes.contains_either_end(&record.range) {
                te_mate_names.insert(record.name);
            }
        }
        Ok(())
    })?;
    Ok(te_mate_names)
}

/// Relationship between one side of a TE event and the reference TEs
///
/// A `None` field is written as the unknown sentinel.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TeSideAnnotation {
    pub te_distance: Option<u64>,
    pub is_within_te: Option<bool>,
}

impl TeSideAnnotation {
    fn from_search(
        chrom_tes: Option<&ChromReferenceTes>,
        get_te_distance: impl Fn(&ChromReferenceTes) -> Option<u64>,
        cluster: &EndCluster,
    ) -> Self {
        match chrom_tes {
            Some(chrom_tes) => Self {
                te_distance: get_te_distance(chrom_tes),
                is_within_te: Some(chrom_tes.contains_either_end(&cluster.range)),
            },
            None => Self {
                te_distance: None,
                is_within_te: Some(false),
            },
        }
    }
}

/// Annotate the plus side span of a TE event
///
/// The reference TE reported is the first found scanning upstream to downstream from the span
/// end. This is not necessarily the nearest reference TE.
///
/// * `reference_tes` - None if no reference TE data is available, in which case both annotation
///   fields are unknown
///
pub fn annotate_plus_side(
    reference_tes: Option<&ReferenceTes>,
    chrom: &str,
    plus: &EndCluster,
) -> TeSideAnnotation {
    let Some(reference_tes) = reference_tes else {
        return TeSideAnnotation::default();
    };
    TeSideAnnotation::from_search(
        reference_tes.get_chrom(chrom),
        |chrom_tes| {
            chrom_tes
                .find_first_te_from(plus.range.end)
                .map(|te| te.start.abs_diff(plus.range.start))
        },
        plus,
    )
}

/// Annotate the minus side span of a TE event
///
/// The reference TE reported is the first found scanning downstream to upstream from the span
/// start. This is not necessarily the nearest reference TE.
///
pub fn annotate_minus_side(
    reference_tes: Option<&ReferenceTes>,
    chrom: &str,
    minus: &EndCluster,
) -> TeSideAnnotation {
    let Some(reference_tes) = reference_tes else {
        return TeSideAnnotation::default();
    };
    TeSideAnnotation::from_search(
        reference_tes.get_chrom(chrom),
        |chrom_tes| {
            chrom_tes
                .find_first_te_to(minus.range.start)
                .map(|te| te.start.abs_diff(minus.range.end))
        },
        minus,
    )
}
