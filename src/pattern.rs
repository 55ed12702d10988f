//! Pattern compilation
//!
//! A pattern is a fixed-length template where `@`, `,`, `%` and `^` expand
//! over the lower, upper, numeric and symbol charsets and every other
//! character is copied as-is. A literal-override string of the same length
//! pins wildcard positions: where the override repeats the marker, the marker
//! itself is emitted verbatim.
//!
//! Compilation turns the pattern plus the boundary strings into one
//! [`PositionInfo`] per output position.

use crate::boundary::Boundaries;
use crate::charset::{CharsetKind, Charsets};
use crate::duplicates::DuplicateLimits;
use crate::error::{GenError, Result};

/// One resolved pattern position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSymbol {
    /// Expands over a charset
    Wildcard(CharsetKind),
    /// Always this character
    Literal(char),
}

/// A pattern with its literal overrides already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    symbols: Vec<PatternSymbol>,
}

impl Pattern {
    /// Parse a pattern, pinning every wildcard the override string repeats
    pub fn new(pattern: &str, literal: Option<&str>) -> Result<Self> {
        let pattern: Vec<char> = pattern.chars().collect();
        let literal: Option<Vec<char>> = literal.map(|l| l.chars().collect());

        if let Some(ref lit) = literal {
            if lit.len() != pattern.len() {
                return Err(GenError::config(format!(
                    "literal string length ({}) must equal pattern length ({})",
                    lit.len(),
                    pattern.len()
                )));
            }
        }

        let symbols = pattern
            .iter()
            .enumerate()
            .map(|(i, &c)| match CharsetKind::from_marker(c) {
                Some(kind) => {
                    let pinned = literal.as_ref().map_or(false, |lit| lit[i] == c);
                    if pinned {
                        PatternSymbol::Literal(c)
                    } else {
                        PatternSymbol::Wildcard(kind)
                    }
                }
                None => PatternSymbol::Literal(c),
            })
            .collect();

        Ok(Self { symbols })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbol(&self, i: usize) -> PatternSymbol {
        self.symbols[i]
    }

    pub fn symbols(&self) -> &[PatternSymbol] {
        &self.symbols
    }
}

/// Which charset governs position `i`; `None` for literal positions
#[inline]
pub fn governing_charset(pattern: Option<&Pattern>, i: usize) -> Option<CharsetKind> {
    match pattern {
        None => Some(CharsetKind::Lower),
        Some(p) => match p.symbol(i) {
            PatternSymbol::Wildcard(kind) => Some(kind),
            PatternSymbol::Literal(_) => None,
        },
    }
}

/// Check that `candidate` can be produced by the pattern (or by the lower charset without one)
pub fn check_member(
    candidate: &[char],
    pattern: Option<&Pattern>,
    charsets: &Charsets,
    what: &str,
) -> Result<()> {
    for (i, &c) in candidate.iter().enumerate() {
        match pattern.map(|p| p.symbol(i)) {
            Some(PatternSymbol::Literal(lit)) => {
                if c != lit {
                    return Err(GenError::config(format!(
                        "{} has {:?} at position {} but the pattern requires {:?}",
                        what, c, i, lit
                    )));
                }
            }
            _ => {
                let kind = governing_charset(pattern, i).unwrap_or(CharsetKind::Lower);
                if !charsets.get(kind).contains(c) {
                    return Err(GenError::config(format!(
                        "{} has {:?} at position {} which is not in the {} charset",
                        what, c, i, kind
                    )));
                }
            }
        }
    }
    Ok(())
}

/// How a compiled position produces its character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Walks the charset
    Varying(CharsetKind),
    /// Never changes; `found_in` is the charset the literal was located in
    Fixed { literal: char, found_in: CharsetKind },
}

/// Compiled description of one output position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionInfo {
    pub slot: Slot,
    pub charset_len: usize,
    pub start_index: usize,
    pub end_index: usize,
    /// Limit of the charset governing this position. Informational: the
    /// duplicate filter resolves each character's own charset through
    /// [`Charsets`], since a varying position may emit characters that
    /// the lookup table attributes to another charset.
    pub duplicate_limit: Option<usize>,
}

impl PositionInfo {
    /// Governing charset; `None` when the position is fixed
    #[inline]
    pub fn charset(&self) -> Option<CharsetKind> {
        match self.slot {
            Slot::Varying(kind) => Some(kind),
            Slot::Fixed { .. } => None,
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.slot, Slot::Fixed { .. })
    }

    /// Character this position shows for `index`
    #[inline]
    pub fn render(&self, charsets: &Charsets, index: usize) -> char {
        match self.slot {
            Slot::Varying(kind) => charsets.get(kind).char_at(index),
            Slot::Fixed { literal, .. } => literal,
        }
    }

    /// Counter value a fresh length starts from
    #[inline]
    pub fn first_index(&self) -> usize {
        if self.is_fixed() {
            self.start_index
        } else {
            0
        }
    }
}

/// Compile one [`PositionInfo`] per position in `0..max_len`
pub fn compile(
    pattern: Option<&Pattern>,
    charsets: &Charsets,
    duplicates: &DuplicateLimits,
    boundaries: &Boundaries,
    max_len: usize,
) -> Result<Vec<PositionInfo>> {
    let mut positions = Vec::with_capacity(max_len);

    for i in 0..max_len {
        let info = match pattern.map(|p| p.symbol(i)) {
            Some(PatternSymbol::Literal(literal)) => compile_fixed(i, literal, charsets, duplicates)?,
            Some(PatternSymbol::Wildcard(kind)) => {
                compile_varying(i, kind, charsets, duplicates, boundaries)?
            }
            None => compile_varying(i, CharsetKind::Lower, charsets, duplicates, boundaries)?,
        };
        positions.push(info);
    }

    log::debug!("compiled {} positions", positions.len());
    Ok(positions)
}

fn compile_fixed(
    i: usize,
    literal: char,
    charsets: &Charsets,
    duplicates: &DuplicateLimits,
) -> Result<PositionInfo> {
    let (found_in, index) = charsets
        .locate(literal)
        .ok_or_else(|| GenError::PatternResolution {
            position: i,
            character: literal,
            expected: "any of the lower, upper, numeric or symbol charsets".to_string(),
        })?;

    Ok(PositionInfo {
        slot: Slot::Fixed { literal, found_in },
        charset_len: charsets.get(found_in).len(),
        start_index: index,
        end_index: index,
        duplicate_limit: duplicates.get(found_in),
    })
}

fn compile_varying(
    i: usize,
    kind: CharsetKind,
    charsets: &Charsets,
    duplicates: &DuplicateLimits,
    boundaries: &Boundaries,
) -> Result<PositionInfo> {
    let set = charsets.get(kind);
    let resolve = |c: char| {
        set.index_of(c).ok_or_else(|| GenError::PatternResolution {
            position: i,
            character: c,
            expected: format!("{} charset", kind),
        })
    };

    let start_index = match boundaries.min_string.get(i) {
        Some(&c) => resolve(c)?,
        None => 0,
    };
    let end = boundaries.max_string.get(i).copied().ok_or_else(|| {
        GenError::config(format!("max string is shorter than position {}", i))
    })?;
    let end_index = resolve(end)?;

    Ok(PositionInfo {
        slot: Slot::Varying(kind),
        charset_len: set.len(),
        start_index,
        end_index,
        duplicate_limit: duplicates.get(kind),
    })
}
