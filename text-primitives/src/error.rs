//! Shared error definitions for text operations.

use std::error::Error as StdError;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by [`Error::LlmCall`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced by text operations.
///
/// JSON parse failures on model output are not represented here: they are
/// absorbed by the result builder's fallback values.
#[derive(Debug, Error)]
pub enum Error {
    /// Required input was missing, empty, or malformed. Raised before any
    /// model call.
    #[error("validation failed: {reason}")]
    Validation {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Schema input could not be normalized.
    #[error("invalid schema: {reason}")]
    Schema {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The underlying chat client failed.
    #[error("LLM call failed: {reason}")]
    LlmCall {
        /// Summary of the failure.
        reason: String,
        /// Original transport error.
        #[source]
        source: BoxedCause,
    },
}

impl Error {
    /// Convenience constructor for validation failures.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for schema failures.
    #[must_use]
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Wraps a transport failure, keeping its message and the original cause.
    #[must_use]
    pub fn llm_call<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::LlmCall {
            reason: source.to_string(),
            source: Box::new(source),
        }
    }

    /// Returns `true` for [`Error::Validation`].
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Reset;

    #[test]
    fn llm_call_keeps_cause() {
        let err = Error::llm_call(Reset);
        assert_eq!(err.to_string(), "LLM call failed: connection reset");
        let source = StdError::source(&err).expect("source");
        assert_eq!(source.to_string(), "connection reset");
    }

    #[test]
    fn validation_helper() {
        let err = Error::validation("text cannot be empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "validation failed: text cannot be empty");
    }
}
