//! Run configuration
//!
//! [`GenOptions`] holds the already-parsed primitives supplied by the command
//! line; [`RunConfig::configure`] validates them once and produces the
//! immutable configuration the enumerator borrows for the whole run.

use crate::boundary::Boundaries;
use crate::charset::{CharsetKind, Charsets};
use crate::duplicates::{exceeds_limit, DuplicateLimits};
use crate::error::{GenError, Result};
use crate::odometer::Order;
use crate::pattern::{check_member, compile, Pattern, PositionInfo};

/// Longest string the generator produces
pub const MAX_LENGTH: usize = 128;

/// Raw generation options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenOptions {
    pub min: usize,
    pub max: usize,
    /// Charset text per slot (lower, upper, numeric, symbol); `None` keeps the default
    pub charsets: [Option<String>; 4],
    pub pattern: Option<String>,
    pub literal: Option<String>,
    pub duplicates: DuplicateLimits,
    pub start: Option<String>,
    pub end: Option<String>,
    pub order: Order,
}

impl GenOptions {
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn charset(mut self, kind: CharsetKind, chars: impl Into<String>) -> Self {
        self.charsets[kind.index()] = Some(chars.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    pub fn duplicates(mut self, duplicates: DuplicateLimits) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn inverted(mut self) -> Self {
        self.order = Order::Inverted;
        self
    }

    /// True if any user-supplied text leaves 7-bit ASCII
    pub fn has_unicode(&self) -> bool {
        self.charsets
            .iter()
            .chain([&self.pattern, &self.literal, &self.start, &self.end])
            .flatten()
            .any(|s| !s.is_ascii())
    }
}

/// Validated, immutable configuration of one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    min: usize,
    max: usize,
    charsets: Charsets,
    pattern: Option<Pattern>,
    duplicates: DuplicateLimits,
    boundaries: Boundaries,
    positions: Vec<PositionInfo>,
    order: Order,
}

impl RunConfig {
    /// Validate `options` and compile them into a run configuration
    pub fn configure(options: &GenOptions) -> Result<Self> {
        let (min, max) = (options.min, options.max);

        if max < min {
            return Err(GenError::config(format!(
                "minimum length ({}) is greater than maximum length ({})",
                min, max
            )));
        }
        if max > MAX_LENGTH {
            return Err(GenError::config(format!(
                "maximum length ({}) exceeds the supported limit of {}",
                max, MAX_LENGTH
            )));
        }
        if options.literal.is_some() && options.pattern.is_none() {
            return Err(GenError::config("a literal string requires a pattern"));
        }

        let raw: [Option<&str>; 4] = [
            options.charsets[0].as_deref(),
            options.charsets[1].as_deref(),
            options.charsets[2].as_deref(),
            options.charsets[3].as_deref(),
        ];
        let charsets = Charsets::from_raw(raw)?;

        let pattern = options
            .pattern
            .as_deref()
            .map(|p| Pattern::new(p, options.literal.as_deref()))
            .transpose()?;

        let start: Option<Vec<char>> = options.start.as_ref().map(|s| s.chars().collect());
        let end: Option<Vec<char>> = options.end.as_ref().map(|s| s.chars().collect());

        for (what, boundary) in [("start string", &start), ("end string", &end)] {
            if let Some(chars) = boundary {
                if let Some(ref p) = pattern {
                    if chars.len() != p.len() {
                        return Err(GenError::config(format!(
                            "{} length ({}) must equal the pattern length ({})",
                            what,
                            chars.len(),
                            p.len()
                        )));
                    }
                }
                check_member(chars, pattern.as_ref(), &charsets, what)?;
                if exceeds_limit(chars.iter().copied(), &options.duplicates, &charsets) {
                    return Err(GenError::config(format!(
                        "{} {:?} will never occur (too many duplicate characters)",
                        what,
                        chars.iter().collect::<String>()
                    )));
                }
            }
        }

        let boundaries = Boundaries::compute(
            min,
            max,
            pattern.as_ref(),
            &charsets,
            start.as_deref(),
            end.as_deref(),
            options.order,
        )?;

        let positions = compile(
            pattern.as_ref(),
            &charsets,
            &options.duplicates,
            &boundaries,
            max,
        )?;

        for (i, p) in positions.iter().enumerate() {
            if !p.is_fixed() && p.charset_len == 0 {
                return Err(GenError::config(format!(
                    "position {} expands over an empty charset",
                    i
                )));
            }
        }

        log::debug!(
            "configured run: min={} max={} pattern={} order={:?}",
            min,
            max,
            options.pattern.as_deref().unwrap_or("<none>"),
            options.order
        );

        Ok(Self {
            min,
            max,
            charsets,
            pattern,
            duplicates: options.duplicates,
            boundaries,
            positions,
            order: options.order,
        })
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    pub fn charsets(&self) -> &Charsets {
        &self.charsets
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn duplicates(&self) -> &DuplicateLimits {
        &self.duplicates
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn positions(&self) -> &[PositionInfo] {
        &self.positions
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Counter values of `min_string`
    pub fn start_indices(&self) -> Vec<usize> {
        self.positions[..self.min]
            .iter()
            .map(|p| p.start_index)
            .collect()
    }

    /// Counter values of `max_string`
    pub fn end_indices(&self) -> Vec<usize> {
        self.positions.iter().map(|p| p.end_index).collect()
    }
}
