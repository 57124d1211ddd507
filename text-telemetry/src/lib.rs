//! Logging setup for binaries built on `llm-text`.
//!
//! The library crates only emit `tracing` events. Applications call
//! [`init_tracing`] once at startup to install a formatting subscriber.

#![warn(missing_docs, clippy::pedantic)]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialised: {reason}")]
    AlreadyInitialised {
        /// Underlying error message.
        reason: String,
    },
}

/// Subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    default_filter: String,
    with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_owned(),
            with_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Sets the directive used when `RUST_LOG` is not present.
    #[must_use]
    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    /// Toggles printing of event targets.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Returns the fallback filter directive.
    #[must_use]
    pub fn default_filter(&self) -> &str {
        &self.default_filter
    }

    /// Builds the filter, preferring `RUST_LOG` over the configured directive.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] if the fallback directive is malformed.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.default_filter).map_err(|err| TelemetryError::InvalidFilter {
            directive: self.default_filter.clone(),
            reason: err.to_string(),
        })
    }
}

/// Installs a global `fmt` subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = config.env_filter()?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_level(true)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInitialised {
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_info() {
        let config = TelemetryConfig::default();
        assert_eq!(config.default_filter(), DEFAULT_FILTER);
        assert!(!config.with_target);
    }

    #[test]
    fn second_init_reports_error() {
        let config = TelemetryConfig::default().with_default_filter("debug");
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(matches!(
            second,
            Err(TelemetryError::AlreadyInitialised { .. })
        ));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"with_target": true}"#).expect("config");
        assert!(config.with_target);
        assert_eq!(config.default_filter(), DEFAULT_FILTER);
    }
}
