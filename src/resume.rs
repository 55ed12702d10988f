//! Resume state codec
//!
//! Rebuilds the enumerator position from the last line a previous run
//! managed to write, so generation continues with the very next candidate.

use crate::config::RunConfig;
use crate::error::{GenError, Result};
use crate::pattern::Slot;

/// Enumerator position of an already emitted candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    pub length: usize,
    pub indices: Vec<usize>,
}

/// Map the last emitted line back to per-position counter values
///
/// Each character is looked up in the charset governing its position (the
/// lower charset when no pattern is set). The line must have a length inside
/// the run's range and sit between the run's boundary strings.
pub fn restore(config: &RunConfig, last_emitted: &str) -> Result<ResumeState> {
    let chars: Vec<char> = last_emitted.chars().collect();
    let length = chars.len();

    if length < config.min() || length > config.max() {
        return Err(GenError::resume_desync(
            last_emitted,
            format!(
                "length {} is outside the configured range {}..={}",
                length,
                config.min(),
                config.max()
            ),
        ));
    }

    let charsets = config.charsets();
    let mut indices = Vec::with_capacity(length);

    for (i, (&c, p)) in chars.iter().zip(config.positions()).enumerate() {
        let index = match p.slot {
            Slot::Varying(kind) => charsets.get(kind).index_of(c).ok_or_else(|| {
                GenError::resume_desync(
                    last_emitted,
                    format!("{:?} at position {} is not in the {} charset", c, i, kind),
                )
            })?,
            Slot::Fixed { literal, .. } => {
                if c != literal {
                    return Err(GenError::resume_desync(
                        last_emitted,
                        format!("position {} must be the literal {:?}, found {:?}", i, literal, c),
                    ));
                }
                p.start_index
            }
        };
        indices.push(index);
    }

    let order = config.order();
    if length == config.min() && order.compare(&indices, &config.start_indices()).is_lt() {
        return Err(GenError::resume_desync(
            last_emitted,
            "line sorts before the start string",
        ));
    }
    if length == config.max() && order.compare(&indices, &config.end_indices()).is_gt() {
        return Err(GenError::resume_desync(
            last_emitted,
            "line sorts after the end string",
        ));
    }

    Ok(ResumeState { length, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharsetKind;
    use crate::config::GenOptions;
    use crate::odometer::{enumerate, Enumerator};

    #[test]
    fn test_restore_indices() {
        let cfg = RunConfig::configure(&GenOptions::new(2, 3)).unwrap();
        let state = restore(&cfg, "cab").unwrap();
        assert_eq!(state.length, 3);
        assert_eq!(state.indices, vec![2, 0, 1]);
    }

    #[test]
    fn test_restore_rejects_bad_length() {
        let cfg = RunConfig::configure(&GenOptions::new(2, 3)).unwrap();
        assert!(matches!(
            restore(&cfg, "abcd"),
            Err(GenError::ResumeDesync { .. })
        ));
        assert!(restore(&cfg, "a").is_err());
    }

    #[test]
    fn test_restore_rejects_foreign_character() {
        let cfg = RunConfig::configure(&GenOptions::new(2, 2)).unwrap();
        let err = restore(&cfg, "a9").unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_restore_with_pattern() {
        let cfg = RunConfig::configure(&GenOptions::new(3, 3).pattern("x@%")).unwrap();
        assert_eq!(restore(&cfg, "xb7").unwrap().indices, vec![23, 1, 7]);
        assert!(restore(&cfg, "yb7").is_err());
    }

    #[test]
    fn test_restore_outside_bounds() {
        let cfg = RunConfig::configure(&GenOptions::new(2, 2).start("ba").end("bz")).unwrap();
        assert!(restore(&cfg, "az").is_err());
        assert!(restore(&cfg, "ca").is_err());
        assert!(restore(&cfg, "bm").is_ok());
    }

    #[test]
    fn test_resume_matches_uninterrupted_run() {
        let cfg = RunConfig::configure(
            &GenOptions::new(1, 3).charset(CharsetKind::Lower, "abc"),
        )
        .unwrap();
        let full: Vec<String> = Enumerator::new(&cfg).collect();

        for (n, line) in full.iter().enumerate() {
            let rest: Vec<String> = enumerate(&cfg, Some(line)).unwrap().collect();
            assert_eq!(rest, full[n + 1..].to_vec(), "resuming after {:?}", line);
        }
    }

    #[test]
    fn test_resume_inverted() {
        let cfg = RunConfig::configure(
            &GenOptions::new(2, 2)
                .charset(CharsetKind::Lower, "ab")
                .inverted(),
        )
        .unwrap();
        let rest: Vec<String> = enumerate(&cfg, Some("ba")).unwrap().collect();
        assert_eq!(rest, vec!["ab", "bb"]);
    }
}
