//! Grading error types.
//!
//! Tokenization never fails; only the division-dependent scoring functions
//! and delimiter configuration can. Both are typed here so callers can match
//! on them instead of inspecting strings.

use thiserror::Error;

/// Errors raised while scoring a response or an attempt sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    /// The passage has no delimiter-marked tokens, so no fraction exists.
    #[error("configuration error: no correct places to grade against")]
    NoCorrectPlaces,

    /// The per-attempt penalty is not a finite value in `0.0..=1.0`.
    #[error("configuration error: penalty must be between 0.0 and 1.0, got {0}")]
    InvalidPenalty(f64),
}

/// Errors raised when building a [`DelimiterPair`](crate::model::DelimiterPair).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelimiterError {
    /// The configuration did not contain exactly two characters.
    #[error("malformed delimiters: expected exactly two characters, got {0:?}")]
    WrongLength(String),

    /// A delimiter character is whitespace and could never occur inside a token.
    #[error("malformed delimiters: {0:?} is whitespace")]
    Whitespace(char),
}

impl GradingError {
    /// Returns `true` if the error stems from the question's configuration
    /// rather than from the learner's input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GradingError::NoCorrectPlaces | GradingError::InvalidPenalty(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = GradingError::NoCorrectPlaces;
        assert!(err.to_string().contains("no correct places"));
        assert!(err.is_configuration());

        let err = GradingError::InvalidPenalty(-0.5);
        assert!(err.to_string().contains("-0.5"));
        assert!(err.is_configuration());

        let err = DelimiterError::WrongLength("[".into());
        assert!(err.to_string().contains("exactly two"));
    }
}
