//! Parse raw evidence records and group them by chromosome or chromosome pair for clustering
//!

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail, try_with};
use strum::EnumCount;

use crate::evidence::{EndEvidence, LinkedEvidence, Strand};
use crate::int_range::IntRange;

/// Read pair categories found in the linked evidence files
///
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, strum::EnumCount, strum::EnumIter, strum::EnumString,
)]
pub enum LinkedEvidenceType {
    /// Divergent orientation
    #[strum(serialize = "DIV")]
    Divergent,

    /// Parallel orientation
    #[strum(serialize = "PAR")]
    Parallel,

    /// Reads mapped to different chromosomes
    #[strum(serialize = "UL", serialize = "UNL")]
    Unlinked,
}

impl LinkedEvidenceType {
    /// Short label used for output file naming and logging
    ///
    pub fn label(&self) -> &'static str {
        match self {
            Self::Divergent => "div",
            Self::Parallel => "par",
            Self::Unlinked => "ul",
        }
    }
}

/// Quality thresholds which both reads of a linked evidence record must pass
///
#[derive(Clone, Debug)]
pub struct ReadQualityFilter {
    pub min_mapq: u32,
    pub max_mismatches: u32,
    pub max_gap: u32,
}

impl ReadQualityFilter {
    fn accept(&self, read: &ReadAlignment) -> bool {
        read.mapq >= self.min_mapq
            && read.mismatches <= self.max_mismatches
            && read.gap <= self.max_gap
    }
}

/// Alignment details for one read of a linked evidence record
///
#[derive(Clone, Debug, PartialEq)]
struct ReadAlignment {
    mapq: u32,
    chrom: String,
    range: IntRange,
    strand: Strand,
    mismatches: u32,
    gap: u32,
}

/// One parsed line of the linked evidence file
///
#[derive(Clone, Debug, PartialEq)]
struct LinkedEvidenceRecord {
    name: String,
    evidence_type: LinkedEvidenceType,
    read1: ReadAlignment,
    read2: ReadAlignment,
}

fn parse_field<T: FromStr>(words: &[&str], index: usize, label: &str) -> SimpleResult<T> {
    let word = words[index];
    match word.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => bail!("Can't parse {} value '{}' in field {}", label, word, index + 1),
    }
}

const LINKED_EVIDENCE_FIELD_COUNT: usize = 17;

/// Parse a linked evidence line in the format:
///
/// `pairname mapq1 chrom1 start1 stop1 strand1 mismatches1 gap1 type`
/// `mapq2 chrom2 start2 stop2 strand2 mismatches2 gap2 type2`
///
fn parse_linked_evidence_line(line: &str) -> SimpleResult<LinkedEvidenceRecord> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    if words.len() < LINKED_EVIDENCE_FIELD_COUNT {
        bail!(
            "Expected {} fields in linked evidence record but found {}",
            LINKED_EVIDENCE_FIELD_COUNT,
            words.len()
        );
    }

    let parse_read = |offset: usize| -> SimpleResult<ReadAlignment> {
        let start = parse_field::<i64>(&words, offset + 2, "start")?;
        let end = parse_field::<i64>(&words, offset + 3, "stop")?;
        Ok(ReadAlignment {
            mapq: parse_field(&words, offset, "mapq")?,
            chrom: words[offset + 1].to_string(),
            range: IntRange::from_pair(start, end),
            strand: Strand::from_code_str(words[offset + 4])?,
            mismatches: parse_field(&words, offset + 5, "mismatch count")?,
            gap: parse_field(&words, offset + 6, "gap count")?,
        })
    };

    let type_str = words[8];
    let evidence_type = match LinkedEvidenceType::from_str(type_str) {
        Ok(x) => x,
        Err(_) => bail!("Unrecognized linked evidence type '{}'", type_str),
    };

    Ok(LinkedEvidenceRecord {
        name: words[0].to_string(),
        evidence_type,
        read1: parse_read(1)?,
        read2: parse_read(9)?,
    })
}

/// Chromosome key for linked evidence
///
/// For single chromosome evidence both labels are the same. For unlinked evidence `chrom1` is
/// always the lexicographically smaller label.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct ChromPair {
    pub chrom1: String,
    pub chrom2: String,
}

impl fmt::Display for ChromPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.chrom1 == self.chrom2 {
            write!(f, "{}", self.chrom1)
        } else {
            write!(f, "{}/{}", self.chrom1, self.chrom2)
        }
    }
}

/// Linked evidence of one type, grouped by chromosome pair
///
#[derive(Default)]
pub struct KeyedLinkedEvidence {
    pub data: BTreeMap<ChromPair, Vec<LinkedEvidence>>,

    /// (start1, start2) of every evidence record accepted so far for each key
    start_pairs: BTreeMap<ChromPair, HashSet<(i64, i64)>>,
}

impl KeyedLinkedEvidence {
    /// Add evidence to the given key unless another record for this key already has the same
    /// (start1, start2) pair
    ///
    /// Returns false if the evidence was rejected as a duplicate
    ///
    pub fn insert(&mut self, key: ChromPair, evidence: LinkedEvidence) -> bool {
        let start_pair = (evidence.range1.start, evidence.range2.start);
        let is_novel = self
            .start_pairs
            .entry(key.clone())
            .or_default()
            .insert(start_pair);
        if is_novel {
            self.data.entry(key).or_default().push(evidence);
        }
        is_novel
    }

    pub fn evidence_count(&self) -> usize {
        self.data.values().map(|x| x.len()).sum()
    }
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct LinkedKeyingStats {
    pub input_record_count: usize,
    pub quality_filtered_record_count: usize,
    pub duplicate_record_count: usize,
}

/// All accepted linked evidence, split by evidence type and then grouped by chromosome pair
///
#[derive(Default)]
pub struct LinkedEvidenceKeys {
    pub types: [KeyedLinkedEvidence; LinkedEvidenceType::COUNT],
    pub stats: LinkedKeyingStats,
}

impl LinkedEvidenceKeys {
    fn add_record(
        &mut self,
        record: LinkedEvidenceRecord,
        filter: &ReadQualityFilter,
    ) -> SimpleResult<()> {
        self.stats.input_record_count += 1;

        if !(filter.accept(&record.read1) && filter.accept(&record.read2)) {
            self.stats.quality_filtered_record_count += 1;
            return Ok(());
        }

        let evidence_type = record.evidence_type;
        let (key, evidence) = normalize_linked_record(record)?;
        if !self.types[evidence_type as usize].insert(key, evidence) {
            self.stats.duplicate_record_count += 1;
        }
        Ok(())
    }

    pub fn get(&self, evidence_type: LinkedEvidenceType) -> &KeyedLinkedEvidence {
        &self.types[evidence_type as usize]
    }

    /// Move all evidence of the given type out for clustering
    ///
    pub fn take_evidence(
        &mut self,
        evidence_type: LinkedEvidenceType,
    ) -> BTreeMap<ChromPair, Vec<LinkedEvidence>> {
        let keyed = std::mem::take(&mut self.types[evidence_type as usize]);
        keyed.data
    }
}

/// Convert a raw record into a keyed evidence record in the canonical read order for its type
///
/// - Divergent: the reverse strand read is placed first
/// - Parallel: the read with the lower start position is placed first
/// - Unlinked: the read on the lexicographically lower chromosome is placed first
///
fn normalize_linked_record(
    record: LinkedEvidenceRecord,
) -> SimpleResult<(ChromPair, LinkedEvidence)> {
    let LinkedEvidenceRecord {
        name,
        evidence_type,
        read1,
        read2,
    } = record;

    let is_same_chrom = read1.chrom == read2.chrom;
    let (first, second) = match evidence_type {
        LinkedEvidenceType::Divergent => {
            if !is_same_chrom {
                bail!("Divergent read pair '{}' maps to two chromosomes", name);
            }
            if read1.strand == read2.strand {
                bail!("Divergent read pair '{}' has both reads on one strand", name);
            }
            if read1.strand == Strand::Reverse {
                (read1, read2)
            } else {
                (read2, read1)
            }
        }
        LinkedEvidenceType::Parallel => {
            if !is_same_chrom {
                bail!("Parallel read pair '{}' maps to two chromosomes", name);
            }
            if read1.range.start < read2.range.start {
                (read1, read2)
            } else {
                (read2, read1)
            }
        }
        LinkedEvidenceType::Unlinked => {
            if is_same_chrom {
                bail!(
                    "Unlinked read pair '{}' has both reads on chromosome '{}'",
                    name,
                    read1.chrom
                );
            }
            if read1.chrom < read2.chrom {
                (read1, read2)
            } else {
                (read2, read1)
            }
        }
    };

    let key = ChromPair {
        chrom1: first.chrom,
        chrom2: second.chrom,
    };
    let evidence = LinkedEvidence {
        range1: first.range,
        range2: second.range,
        strand1: first.strand,
        strand2: second.strand,
        name,
    };
    Ok((key, evidence))
}

/// Read all records from one linked evidence stream into `keys`
///
/// * `label` - used to describe the stream in error messages
///
pub fn read_linked_evidence(
    reader: impl BufRead,
    label: &str,
    filter: &ReadQualityFilter,
    keys: &mut LinkedEvidenceKeys,
) -> SimpleResult<()> {
    for (line_index, line) in reader.lines().enumerate() {
        let line = try_with!(line, "Can't read line {} of {}", line_index + 1, label);
        if line.trim().is_empty() {
            continue;
        }
        let record = try_with!(
            parse_linked_evidence_line(&line),
            "Invalid record at line {} of {}",
            line_index + 1,
            label
        );
        try_with!(
            keys.add_record(record, filter),
            "Invalid record at line {} of {}",
            line_index + 1,
            label
        );
    }
    Ok(())
}

/// One parsed line from the unique or multi read file of unique/multi read pairs
///
/// Line format is `name mapq chrom start stop [strand ...]`, only the unique read file is
/// required to have the strand field.
///
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorRecord {
    pub name: String,
    pub chrom: String,
    pub range: IntRange,
    pub strand: Option<Strand>,
}

fn parse_anchor_line(line: &str, is_strand_required: bool) -> SimpleResult<AnchorRecord> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let min_field_count = if is_strand_required { 6 } else { 5 };
    if words.len() < min_field_count {
        bail!(
            "Expected {} fields in anchor record but found {}",
            min_field_count,
            words.len()
        );
    }
    let start = parse_field::<i64>(&words, 3, "start")?;
    let end = parse_field::<i64>(&words, 4, "stop")?;
    let strand = if is_strand_required {
        Some(Strand::from_code_str(words[5])?)
    } else {
        None
    };
    Ok(AnchorRecord {
        name: words[0].to_string(),
        chrom: words[2].to_string(),
        range: IntRange::from_pair(start, end),
        strand,
    })
}

/// Visit every record of a unique/multi pair read file
///
/// * `is_strand_required` - true for the unique read file, where strand determines TE side
///
pub fn for_each_anchor_record(
    reader: impl BufRead,
    label: &str,
    is_strand_required: bool,
    mut f: impl FnMut(AnchorRecord) -> SimpleResult<()>,
) -> SimpleResult<()> {
    for (line_index, line) in reader.lines().enumerate() {
        let line = try_with!(line, "Can't read line {} of {}", line_index + 1, label);
        if line.trim().is_empty() {
            continue;
        }
        let record = try_with!(
            parse_anchor_line(&line, is_strand_required),
            "Invalid record at line {} of {}",
            line_index + 1,
            label
        );
        f(record)?;
    }
    Ok(())
}

/// TE anchor evidence grouped by chromosome
///
pub type KeyedEndEvidence = BTreeMap<String, Vec<EndEvidence>>;

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AnchorKeyingStats {
    pub input_record_count: usize,

    /// Anchors skipped because their mate read was not found to hit a reference TE
    pub non_te_mate_record_count: usize,
}

/// Read TE anchor positions from the unique read file
///
/// * `te_mate_names` - If provided, only anchors with a name in this set are kept
///
pub fn read_anchor_evidence(
    reader: impl BufRead,
    label: &str,
    te_mate_names: Option<&HashSet<String>>,
) -> SimpleResult<(KeyedEndEvidence, AnchorKeyingStats)> {
    let mut keyed_evidence = KeyedEndEvidence::new();
    let mut stats = AnchorKeyingStats::default();
    for_each_anchor_record(reader, label, true, |record| {
        stats.input_record_count += 1;
        if let Some(te_mate_names) = te_mate_names {
            if !te_mate_names.contains(&record.name) {
                stats.non_te_mate_record_count += 1;
                return Ok(());
            }
        }
        let Some(strand) = record.strand else {
            bail!("Missing strand for anchor read '{}'", record.name);
        };
        keyed_evidence
            .entry(record.chrom)
            .or_default()
            .push(EndEvidence {
                pos: record.range.start,
                strand,
            });
        Ok(())
    })?;
    Ok((keyed_evidence, stats))
}
