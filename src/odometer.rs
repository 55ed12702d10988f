//! Odometer enumeration
//!
//! Walks every string between the run's boundary strings, length by length.
//! Each output position is a wheel bounded by its [`PositionInfo`]; the least
//! significant wheel turns on every step and carries into its neighbour when
//! it wraps, exactly like a mechanical odometer.
//!
//! In [`Order::Forward`] the rightmost position is least significant
//! (`aaa, aab, aac`); in [`Order::Inverted`] the leftmost is
//! (`aaa, baa, caa`).

use std::cmp::Ordering;

use crate::config::RunConfig;
use crate::duplicates::exceeds_limit;
use crate::error::Result;
use crate::pattern::PositionInfo;
use crate::resume::{restore, ResumeState};

/// Which end of the string changes fastest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Rightmost position changes fastest
    #[default]
    Forward,
    /// Leftmost position changes fastest
    Inverted,
}

impl Order {
    /// Positions of a `len`-long string, most significant first
    pub fn significance(self, len: usize) -> impl Iterator<Item = usize> {
        (0..len).map(move |k| match self {
            Order::Forward => k,
            Order::Inverted => len - 1 - k,
        })
    }

    /// Compare two counter vectors of equal length in this order
    pub fn compare(self, a: &[usize], b: &[usize]) -> Ordering {
        debug_assert_eq!(a.len(), b.len());
        for i in self.significance(a.len()) {
            match a[i].cmp(&b[i]) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

/// Turn the wheels one notch
///
/// Fixed positions are skipped. Wrapped wheels restart at the charset's
/// first character. Returns `false` once the carry falls off the most
/// significant position, leaving every wheel reset.
pub fn step(counters: &mut [usize], positions: &[PositionInfo], order: Order) -> bool {
    let len = counters.len();
    for k in 0..len {
        let i = match order {
            Order::Forward => len - 1 - k,
            Order::Inverted => k,
        };
        let p = &positions[i];
        if p.is_fixed() {
            continue;
        }
        if counters[i] + 1 < p.charset_len {
            counters[i] += 1;
            return true;
        }
        counters[i] = 0;
    }
    false
}

/// Current position of the enumerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratorState {
    pub length: usize,
    /// One counter per position of the current length
    pub indices: Vec<usize>,
}

/// Lazy, finite sequence of candidates for one run
///
/// The state always describes the next candidate to render; `None` means
/// every length has been exhausted.
pub struct Enumerator<'a> {
    config: &'a RunConfig,
    state: Option<EnumeratorState>,
    end: Vec<usize>,
    filter: bool,
    skipped: u64,
}

impl<'a> Enumerator<'a> {
    /// Start at `min_string`
    pub fn new(config: &'a RunConfig) -> Self {
        let state = EnumeratorState {
            length: config.min(),
            indices: config.start_indices(),
        };
        Self::with_state(config, Some(state))
    }

    /// Continue right after the candidate described by `resume`
    pub fn resume(config: &'a RunConfig, resume: ResumeState) -> Self {
        let mut enumerator = Self::with_state(
            config,
            Some(EnumeratorState {
                length: resume.length,
                indices: resume.indices,
            }),
        );
        enumerator.advance_state();
        enumerator
    }

    fn with_state(config: &'a RunConfig, state: Option<EnumeratorState>) -> Self {
        Self {
            config,
            state,
            end: config.end_indices(),
            filter: config.duplicates().is_active(),
            skipped: 0,
        }
    }

    /// Position of the next candidate, `None` once exhausted
    pub fn state(&self) -> Option<&EnumeratorState> {
        self.state.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_none()
    }

    /// Candidates dropped by the duplicate filter so far
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn render(&self, state: &EnumeratorState) -> String {
        let charsets = self.config.charsets();
        state
            .indices
            .iter()
            .zip(self.config.positions())
            .map(|(&index, p)| p.render(charsets, index))
            .collect()
    }

    fn advance_state(&mut self) {
        let max = self.config.max();
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if state.length == max && state.indices == self.end {
            self.state = None;
            return;
        }

        let positions = &self.config.positions()[..state.length];
        if step(&mut state.indices, positions, self.config.order()) {
            return;
        }

        if state.length < max {
            state.length += 1;
            state.indices = self.config.positions()[..state.length]
                .iter()
                .map(PositionInfo::first_index)
                .collect();
            log::debug!("advancing to length {}", state.length);
        } else {
            self.state = None;
        }
    }
}

impl Iterator for Enumerator<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let candidate = self.render(self.state.as_ref()?);
            self.advance_state();

            if self.filter
                && exceeds_limit(
                    candidate.chars(),
                    self.config.duplicates(),
                    self.config.charsets(),
                )
            {
                self.skipped += 1;
                continue;
            }

            return Some(candidate);
        }
    }
}

/// Enumerate a run, optionally continuing after the last line of a previous run
pub fn enumerate<'a>(config: &'a RunConfig, resume_from: Option<&str>) -> Result<Enumerator<'a>> {
    match resume_from {
        Some(line) => {
            let state = restore(config, line)?;
            log::info!("resuming after {:?}", line);
            Ok(Enumerator::resume(config, state))
        }
        None => Ok(Enumerator::new(config)),
    }
}
