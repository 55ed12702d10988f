//! Boundary strings
//!
//! Computes the first and last strings of the run: the smallest string of
//! the minimum length (or the user start string), the largest string of the
//! maximum length (or the user end string), plus the last string of the
//! minimum length and the first string of the maximum length.

use crate::charset::Charsets;
use crate::error::{GenError, Result};
use crate::odometer::Order;
use crate::pattern::{governing_charset, Pattern, PatternSymbol};

/// The four boundary strings of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundaries {
    /// Largest string of length `min`
    pub last_min: Vec<char>,
    /// Smallest string of length `max`
    pub first_max: Vec<char>,
    /// First string emitted
    pub min_string: Vec<char>,
    /// Last string emitted
    pub max_string: Vec<char>,
}

impl Boundaries {
    pub fn compute(
        min: usize,
        max: usize,
        pattern: Option<&Pattern>,
        charsets: &Charsets,
        start: Option<&[char]>,
        end: Option<&[char]>,
        order: Order,
    ) -> Result<Self> {
        let mut boundaries = match pattern {
            None => Self::from_lower(min, max, charsets),
            Some(p) => {
                if p.len() != min || p.len() != max {
                    return Err(GenError::config(format!(
                        "pattern length ({}) must equal both min ({}) and max ({})",
                        p.len(),
                        min,
                        max
                    )));
                }
                Self::from_pattern(p, charsets)
            }
        };

        if let Some(start) = start {
            if start.len() != min {
                return Err(GenError::config(format!(
                    "start string length ({}) must equal the minimum length ({})",
                    start.len(),
                    min
                )));
            }
            boundaries.min_string[..min].copy_from_slice(start);
        }

        if let Some(end) = end {
            if end.len() != max {
                return Err(GenError::config(format!(
                    "end string length ({}) must equal the maximum length ({})",
                    end.len(),
                    max
                )));
            }
            boundaries.max_string[..max].copy_from_slice(end);
        }

        if let (Some(start), Some(end)) = (start, end) {
            check_order(start, end, pattern, charsets, order)?;
        }

        log::debug!(
            "boundaries: min_string={:?} max_string={:?}",
            boundaries.min_string.iter().collect::<String>(),
            boundaries.max_string.iter().collect::<String>()
        );

        Ok(boundaries)
    }

    fn from_lower(min: usize, max: usize, charsets: &Charsets) -> Self {
        let lower = charsets.lower();
        Self {
            last_min: vec![lower.last(); min],
            first_max: vec![lower.first(); max],
            min_string: vec![lower.first(); min],
            max_string: vec![lower.last(); max],
        }
    }

    fn from_pattern(pattern: &Pattern, charsets: &Charsets) -> Self {
        let len = pattern.len();
        let mut b = Self {
            last_min: Vec::with_capacity(len),
            first_max: Vec::with_capacity(len),
            min_string: Vec::with_capacity(len),
            max_string: Vec::with_capacity(len),
        };

        for &symbol in pattern.symbols() {
            let (first, last) = match symbol {
                PatternSymbol::Literal(c) => (c, c),
                PatternSymbol::Wildcard(kind) => {
                    let set = charsets.get(kind);
                    (set.first(), set.last())
                }
            };
            b.min_string.push(first);
            b.first_max.push(first);
            b.max_string.push(last);
            b.last_min.push(last);
        }

        b
    }
}

/// Reject an end string that sorts before the start string
///
/// Only strings of equal length are compared; a longer end string always
/// sorts after a shorter start string. Equal strings are accepted.
pub fn check_order(
    start: &[char],
    end: &[char],
    pattern: Option<&Pattern>,
    charsets: &Charsets,
    order: Order,
) -> Result<()> {
    if start.len() != end.len() {
        return Ok(());
    }

    for i in order.significance(start.len()) {
        let (s, e) = (start[i], end[i]);
        if s == e {
            continue;
        }

        let kind = match governing_charset(pattern, i) {
            Some(kind) => kind,
            // literal positions cannot differ between two members of the pattern
            None => {
                return Err(GenError::config(format!(
                    "start and end differ at literal position {}",
                    i
                )))
            }
        };

        let set = charsets.get(kind);
        let index = |c: char| {
            set.index_of(c).ok_or_else(|| GenError::PatternResolution {
                position: i,
                character: c,
                expected: format!("{} charset", kind),
            })
        };

        let (si, ei) = (index(s)?, index(e)?);
        if si > ei {
            return Err(GenError::InvalidRange {
                start: start.iter().collect(),
                end: end.iter().collect(),
                position: i,
            });
        }
        return Ok(());
    }

    Ok(())
}
