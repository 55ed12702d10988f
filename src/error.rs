//! Error taxonomy for the generation engine
//!
//! Every variant carries enough context (position, character, charset) to act
//! on it without re-deriving engine state. The application layer wraps these
//! in `anyhow` errors.

use thiserror::Error;

use crate::charset::CharsetKind;

/// Errors raised while configuring or driving the enumeration engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// Inconsistent lengths, pattern/literal mismatch, oversized max, etc.
    #[error("invalid configuration: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// A charset that must hold characters ended up empty.
    #[error("invalid {kind} charset: {reason}")]
    InvalidCharset {
        /// Which charset slot failed
        kind: CharsetKind,
        /// Why it was rejected
        reason: String,
    },

    /// The end string sorts before the start string.
    #[error("end string {end:?} must sort after start string {start:?} (differs at position {position})")]
    InvalidRange {
        start: String,
        end: String,
        /// First position where the two strings disagree
        position: usize,
    },

    /// A literal or boundary character is missing from the charset it must come from.
    #[error("cannot resolve {character:?} at position {position} in {expected}")]
    PatternResolution {
        position: usize,
        character: char,
        /// Human readable description of the charset(s) that were searched
        expected: String,
    },

    /// The last line of a previous run does not fit the current configuration.
    #[error("cannot resume from {line:?}: {reason}")]
    ResumeDesync {
        /// Offending line as read from the output file
        line: String,
        reason: String,
    },

    /// The requested operation has no meaning in the current mode.
    #[error("{operation} is not supported: {reason}")]
    UnsupportedOperation {
        operation: &'static str,
        reason: String,
    },
}

impl GenError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a ResumeDesync error.
    pub fn resume_desync(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResumeDesync {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedOperation error.
    pub fn unsupported(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation,
            reason: reason.into(),
        }
    }

    /// Whether the failure only concerns the resume path
    ///
    /// Callers may fall back to a fresh session for these.
    pub fn is_resume_failure(&self) -> bool {
        matches!(
            self,
            Self::ResumeDesync { .. } | Self::UnsupportedOperation { .. }
        )
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = GenError::PatternResolution {
            position: 3,
            character: 'é',
            expected: "lower charset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("position 3"));
        assert!(msg.contains("'é'"));
        assert!(msg.contains("lower charset"));

        let err = GenError::InvalidRange {
            start: "bz".to_string(),
            end: "ba".to_string(),
            position: 1,
        };
        assert!(err.to_string().contains("\"ba\""));
    }

    #[test]
    fn test_resume_failures_are_flagged() {
        assert!(GenError::resume_desync("abc", "too long").is_resume_failure());
        assert!(GenError::unsupported("resume", "permutation mode").is_resume_failure());
        assert!(!GenError::config("max < min").is_resume_failure());
    }
}
