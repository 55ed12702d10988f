//! Output size estimation
//!
//! Counts how many lines and bytes a run produces before generating
//! anything. Positions are treated as digits of a mixed-radix number, so the
//! count for a length is the distance between the ranks of its first and last
//! string. Duplicate filtering is not modeled, which makes the figures an
//! upper bound when limits are set.

use crate::config::RunConfig;
use crate::odometer::Order;
use crate::pattern::PositionInfo;
use crate::permute::Permutations;

/// Expected output volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceEstimate {
    pub lines: u128,
    pub bytes: u128,
}

impl SpaceEstimate {
    /// Line count as `u64`, if it fits
    pub fn lines_u64(&self) -> Option<u64> {
        u64::try_from(self.lines).ok()
    }

    /// Byte count as `u64`, if it fits
    pub fn bytes_u64(&self) -> Option<u64> {
        u64::try_from(self.bytes).ok()
    }
}

/// Estimate the output of an odometer run
pub fn estimate(config: &RunConfig) -> SpaceEstimate {
    let (min, max) = (config.min(), config.max());
    let positions = config.positions();
    let order = config.order();

    let start_rank = rank(&config.start_indices(), &positions[..min], order);
    let end_rank = rank(&config.end_indices(), positions, order);

    let mut total = SpaceEstimate::default();

    for len in min..=max {
        let span = &positions[..len];
        let lines = if min == max {
            end_rank.saturating_sub(start_rank).saturating_add(1)
        } else if len == min {
            capacity(span).saturating_sub(start_rank)
        } else if len == max {
            end_rank.saturating_add(1)
        } else {
            capacity(span)
        };

        let width = line_width(span, config);
        total.lines = total.lines.saturating_add(lines);
        total.bytes = total.bytes.saturating_add(lines.saturating_mul(width));
    }

    total
}

/// Estimate the output of a permutation run
pub fn estimate_permutations(perms: &Permutations) -> SpaceEstimate {
    let lines = perms.total();
    SpaceEstimate {
        lines,
        bytes: lines.saturating_mul(perms.line_bytes()),
    }
}

fn radix(p: &PositionInfo) -> u128 {
    if p.is_fixed() {
        1
    } else {
        p.charset_len as u128
    }
}

/// Number of distinct strings over `positions`
fn capacity(positions: &[PositionInfo]) -> u128 {
    positions
        .iter()
        .fold(1u128, |acc, p| acc.saturating_mul(radix(p)))
}

/// Zero-based position of `indices` in enumeration order
fn rank(indices: &[usize], positions: &[PositionInfo], order: Order) -> u128 {
    let mut rank: u128 = 0;
    for i in order.significance(indices.len()) {
        let p = &positions[i];
        let digit = if p.is_fixed() { 0 } else { indices[i] as u128 };
        rank = rank.saturating_mul(radix(p)).saturating_add(digit);
    }
    rank
}

/// Widest encoded line over `positions`, newline included
fn line_width(positions: &[PositionInfo], config: &RunConfig) -> u128 {
    let charsets = config.charsets();
    let chars: usize = positions
        .iter()
        .map(|p| match p.charset() {
            Some(kind) => charsets.get(kind).max_utf8_len(),
            None => p.render(charsets, p.start_index).len_utf8(),
        })
        .sum();
    chars as u128 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharsetKind;
    use crate::config::GenOptions;
    use crate::odometer::Enumerator;

    fn check(opts: GenOptions) {
        let cfg = RunConfig::configure(&opts).unwrap();
        let lines: Vec<String> = Enumerator::new(&cfg).collect();
        let est = estimate(&cfg);
        assert_eq!(est.lines, lines.len() as u128, "{:?}", opts);
        let bytes: usize = lines.iter().map(|l| l.len() + 1).sum();
        assert_eq!(est.bytes, bytes as u128);
    }

    #[test]
    fn test_full_range() {
        let cfg = RunConfig::configure(&GenOptions::new(1, 3)).unwrap();
        let est = estimate(&cfg);
        assert_eq!(est.lines, 26 + 26 * 26 + 26 * 26 * 26);
        assert_eq!(est.bytes, 26 * 2 + 676 * 3 + 17576 * 4);
    }

    #[test]
    fn test_matches_enumeration() {
        check(GenOptions::new(2, 2).start("ba").end("bz"));
        check(GenOptions::new(1, 3).charset(CharsetKind::Lower, "abc").start("b").end("bca"));
        check(GenOptions::new(3, 3).pattern("x@%"));
        check(
            GenOptions::new(2, 2)
                .charset(CharsetKind::Lower, "abc")
                .start("ca")
                .end("bb")
                .inverted(),
        );
        check(GenOptions::new(0, 2).charset(CharsetKind::Lower, "ab"));
    }

    #[test]
    fn test_unicode_width_is_upper_bound() {
        let cfg = RunConfig::configure(
            &GenOptions::new(1, 1).charset(CharsetKind::Lower, "aé"),
        )
        .unwrap();
        let est = estimate(&cfg);
        assert_eq!(est.lines, 2);
        assert_eq!(est.bytes, 6);
    }

    #[test]
    fn test_permutations() {
        let perms = Permutations::from_word("abc").unwrap();
        let est = estimate_permutations(&perms);
        assert_eq!(est, SpaceEstimate { lines: 6, bytes: 24 });
    }

    #[test]
    fn test_huge_run_saturates_u64_conversion() {
        let cfg = RunConfig::configure(&GenOptions::new(20, 20)).unwrap();
        let est = estimate(&cfg);
        assert!(est.lines_u64().is_none());
        assert!(est.lines > u64::MAX as u128);
    }
}
