//! Evidence records consumed by the clustering routines
//!

use std::fmt;

use simple_error::{SimpleResult, bail};

use crate::int_range::IntRange;

/// Strand of an aligned read
///
/// The numeric representation matches the intermediate file encoding: 0 is forward, 1 is reverse
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, strum::FromRepr)]
#[repr(u8)]
pub enum Strand {
    Forward = 0,
    Reverse = 1,
}

impl Strand {
    /// Parse strand from its intermediate file encoding
    ///
    pub fn from_code_str(s: &str) -> SimpleResult<Self> {
        let code = match s.parse::<u8>() {
            Ok(x) => x,
            Err(_) => bail!("Invalid strand value '{}'", s),
        };
        match Self::from_repr(code) {
            Some(x) => Ok(x),
            None => bail!("Strand value '{}' is not 0 or 1", code),
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One two-interval observation, typically both reads of a discordant read pair
///
/// Evidence is never mutated after keying. Clusters refer to evidence by its index in the
/// owning key's evidence list.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkedEvidence {
    pub range1: IntRange,
    pub range2: IntRange,
    pub strand1: Strand,
    pub strand2: Strand,

    /// Read pair name, used for reporting only
    pub name: String,
}

impl LinkedEvidence {
    /// Key providing the total clustering order for linked evidence
    ///
    pub fn sort_key(&self) -> (i64, i64, Strand, Strand) {
        (
            self.range1.start,
            self.range2.start,
            self.strand1,
            self.strand2,
        )
    }
}

/// One single-position observation, typically the uniquely mapped read of a unique/multi pair
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndEvidence {
    pub pos: i64,
    pub strand: Strand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parse() {
        assert_eq!(Strand::from_code_str("0").unwrap(), Strand::Forward);
        assert_eq!(Strand::from_code_str("1").unwrap(), Strand::Reverse);
        assert!(Strand::from_code_str("2").is_err());
        assert!(Strand::from_code_str("+").is_err());
        assert_eq!(Strand::Reverse.to_string(), "1");
    }
}
