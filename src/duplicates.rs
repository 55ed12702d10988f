//! Duplicate run filtering
//!
//! Rejects candidates containing a run of the same character longer than the
//! limit configured for the charset holding that character. A missing limit
//! means the charset is unrestricted.

use crate::charset::{CharsetKind, Charsets};

/// Allowed consecutive-repeat length per charset slot (lower, upper, numeric, symbol)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateLimits {
    limits: [Option<usize>; 4],
}

impl DuplicateLimits {
    /// No restrictions on any charset
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn new(limits: [Option<usize>; 4]) -> Self {
        Self { limits }
    }

    /// Set the limit for one charset
    pub fn with(mut self, kind: CharsetKind, limit: usize) -> Self {
        self.limits[kind.index()] = Some(limit);
        self
    }

    #[inline]
    pub fn get(&self, kind: CharsetKind) -> Option<usize> {
        self.limits[kind.index()]
    }

    pub fn set(&mut self, kind: CharsetKind, limit: Option<usize>) {
        self.limits[kind.index()] = limit;
    }

    /// True when at least one charset has a limit
    #[inline]
    pub fn is_active(&self) -> bool {
        self.limits.iter().any(Option::is_some)
    }

    pub fn as_array(&self) -> [Option<usize>; 4] {
        self.limits
    }
}

/// Check whether `candidate` holds a repeat run longer than its charset allows
///
/// Runs start at length 1 and are only checked once they continue, so a limit
/// of 0 behaves like a limit of 1: no consecutive repeats at all.
pub fn exceeds_limit<I>(candidate: I, limits: &DuplicateLimits, charsets: &Charsets) -> bool
where
    I: IntoIterator<Item = char>,
{
    if !limits.is_active() {
        return false;
    }

    let mut current: Option<char> = None;
    let mut run = 0usize;

    for c in candidate {
        if current == Some(c) {
            run += 1;
            if run_exceeds(c, run, limits, charsets) {
                return true;
            }
        } else {
            current = Some(c);
            run = 1;
        }
    }

    false
}

/// A character may live in several charsets; any of them with an exceeded limit rejects it
#[inline]
fn run_exceeds(c: char, run: usize, limits: &DuplicateLimits, charsets: &Charsets) -> bool {
    CharsetKind::ALL.iter().any(|&kind| match limits.get(kind) {
        Some(limit) => run > limit && charsets.get(kind).contains(c),
        None => false,
    })
}
