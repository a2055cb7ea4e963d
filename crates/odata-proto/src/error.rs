//! Literal conversion errors.

use thiserror::Error;

/// Errors raised while converting literal text into a typed [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The text is not a valid literal of the expected type.
    #[error("invalid {expected} literal: '{text}'")]
    InvalidLiteral { text: String, expected: &'static str },
}

impl Error {
    /// Create an invalid literal error.
    pub fn invalid_literal(text: impl Into<String>, expected: &'static str) -> Self {
        Error::InvalidLiteral {
            text: text.into(),
            expected,
        }
    }
}
