//! Configuration for text operations.
//!
//! A [`TextConfig`] carries the global default model, the sampling
//! temperature, per-operation model overrides, and the schema strictness
//! policy. It is built once (in code, from the environment, or from JSON),
//! adjusted through the `set_*` methods during start-up, and then shared
//! read-only by the model gateway. Reconfiguring while operations are in
//! flight is the caller's responsibility; the gateway holds its own `Arc`
//! snapshot.

#![warn(missing_docs, clippy::pedantic)]

use std::collections::BTreeMap;
use std::env;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use text_primitives::{Operation, SchemaStrictness};
use thiserror::Error;
use tracing::debug;

/// Temperature used when nothing else is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Prefix shared by every environment variable read by [`TextConfig::from_env`].
pub const ENV_PREFIX: &str = "LLM_TEXT_";

const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Temperature outside the accepted range.
    #[error("temperature must be a finite value between 0.0 and 2.0, got {value}")]
    InvalidTemperature {
        /// Rejected value.
        value: f32,
    },

    /// An environment value could not be interpreted.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// JSON configuration could not be decoded.
    #[error("failed to decode configuration: {source}")]
    Decode {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
}

/// Model selection and sampling settings shared by all operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    default_model: Option<String>,
    temperature: f32,
    model_overrides: BTreeMap<Operation, String>,
    schema_strictness: SchemaStrictness,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_model: None,
            temperature: DEFAULT_TEMPERATURE,
            model_overrides: BTreeMap::new(),
            schema_strictness: SchemaStrictness::default(),
        }
    }
}

impl TextConfig {
    /// Returns a builder seeded with defaults.
    #[must_use]
    pub fn builder() -> TextConfigBuilder {
        TextConfigBuilder::default()
    }

    /// Loads configuration from `LLM_TEXT_*` environment variables.
    ///
    /// Recognised keys: `LLM_TEXT_DEFAULT_MODEL`, `LLM_TEXT_TEMPERATURE`,
    /// `LLM_TEXT_SCHEMA_STRICTNESS` (`lenient`/`strict`), and
    /// `LLM_TEXT_<OPERATION>_MODEL` (for example `LLM_TEXT_KEY_POINTS_MODEL`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present variable holds an invalid value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TextConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value is invalid.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |suffix: &str| {
            let key = format!("{ENV_PREFIX}{suffix}");
            lookup(&key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        };

        let mut config = Self::default();

        if let Some((_, model)) = read("DEFAULT_MODEL") {
            config.default_model = Some(model);
        }

        if let Some((key, raw)) = read("TEMPERATURE") {
            let value = raw.parse::<f32>().map_err(|err| ConfigError::InvalidValue {
                key,
                reason: err.to_string(),
            })?;
            config.set_temperature(value)?;
        }

        if let Some((key, raw)) = read("SCHEMA_STRICTNESS") {
            config.schema_strictness = match raw.to_ascii_lowercase().as_str() {
                "lenient" => SchemaStrictness::Lenient,
                "strict" => SchemaStrictness::Strict,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key,
                        reason: format!("expected `lenient` or `strict`, got `{other}`"),
                    });
                }
            };
        }

        for operation in Operation::ALL {
            let suffix = format!("{}_MODEL", operation.as_str().to_ascii_uppercase());
            if let Some((_, model)) = read(&suffix) {
                config.model_overrides.insert(operation, model);
            }
        }

        debug!(
            default_model = ?config.default_model,
            temperature = config.temperature,
            overrides = config.model_overrides.len(),
            "loaded text configuration from environment"
        );

        Ok(config)
    }

    /// Decodes configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] for malformed JSON and
    /// [`ConfigError::InvalidTemperature`] for an out-of-range temperature.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        validate_temperature(config.temperature)?;
        Ok(config)
    }

    /// Global default model, if configured.
    #[must_use]
    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Model override for a single operation.
    #[must_use]
    pub fn model_override(&self, operation: Operation) -> Option<&str> {
        self.model_overrides.get(&operation).map(String::as_str)
    }

    /// Model to use for `operation`: its override, else the global default.
    #[must_use]
    pub fn model_for(&self, operation: Operation) -> Option<&str> {
        self.model_override(operation).or(self.default_model())
    }

    /// How unrecognised schema field types are treated.
    #[must_use]
    pub const fn schema_strictness(&self) -> SchemaStrictness {
        self.schema_strictness
    }

    /// Sets or clears the global default model.
    pub fn set_default_model(&mut self, model: Option<String>) {
        self.default_model = model;
    }

    /// Sets the sampling temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemperature`] outside `0.0..=2.0`.
    pub fn set_temperature(&mut self, temperature: f32) -> ConfigResult<()> {
        validate_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    /// Sets the model used by a single operation.
    pub fn set_model_override(&mut self, operation: Operation, model: impl Into<String>) {
        self.model_overrides.insert(operation, model.into());
    }

    /// Removes a per-operation model override.
    pub fn clear_model_override(&mut self, operation: Operation) {
        self.model_overrides.remove(&operation);
    }

    /// Sets the schema strictness policy.
    pub fn set_schema_strictness(&mut self, strictness: SchemaStrictness) {
        self.schema_strictness = strictness;
    }
}

/// Builder for [`TextConfig`].
#[derive(Debug, Default)]
pub struct TextConfigBuilder {
    config: TextConfig,
}

impl TextConfigBuilder {
    /// Sets the global default model.
    #[must_use]
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = Some(model.into());
        self
    }

    /// Sets the sampling temperature (validated in [`TextConfigBuilder::build`]).
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Overrides the model for one operation.
    #[must_use]
    pub fn model_for(mut self, operation: Operation, model: impl Into<String>) -> Self {
        self.config.set_model_override(operation, model);
        self
    }

    /// Sets the schema strictness policy.
    #[must_use]
    pub fn schema_strictness(mut self, strictness: SchemaStrictness) -> Self {
        self.config.schema_strictness = strictness;
        self
    }

    /// Finalises the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemperature`] outside `0.0..=2.0`.
    pub fn build(self) -> ConfigResult<TextConfig> {
        validate_temperature(self.config.temperature)?;
        Ok(self.config)
    }
}

/// Checks that `value` is a finite temperature within `0.0..=2.0`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTemperature`] otherwise.
pub fn validate_temperature(value: f32) -> ConfigResult<()> {
    if value.is_finite() && TEMPERATURE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTemperature { value })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = TextConfig::default();
        assert!((config.temperature() - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.default_model(), None);
        assert_eq!(config.model_for(Operation::Summarize), None);
        assert_eq!(config.schema_strictness(), SchemaStrictness::Lenient);
    }

    #[test]
    fn override_wins_over_default_model() {
        let config = TextConfig::builder()
            .default_model("gpt-4o-mini")
            .model_for(Operation::Extract, "claude-sonnet-4-5")
            .build()
            .unwrap();

        assert_eq!(config.model_for(Operation::Extract), Some("claude-sonnet-4-5"));
        assert_eq!(config.model_for(Operation::Translate), Some("gpt-4o-mini"));
    }

    #[test]
    fn explicit_mutation() {
        let mut config = TextConfig::default();
        config.set_model_override(Operation::Classify, "small");
        assert_eq!(config.model_for(Operation::Classify), Some("small"));
        config.clear_model_override(Operation::Classify);
        assert_eq!(config.model_for(Operation::Classify), None);

        assert!(config.set_temperature(2.5).is_err());
        assert!(config.set_temperature(f32::NAN).is_err());
        config.set_temperature(0.0).unwrap();
        assert!(config.temperature().abs() < f32::EPSILON);
    }

    #[test]
    fn builder_validates_temperature() {
        let err = TextConfig::builder().temperature(-0.1).build().expect_err("range");
        assert!(matches!(err, ConfigError::InvalidTemperature { .. }));
    }

    #[test]
    fn reads_environment_style_lookup() {
        let config = TextConfig::from_lookup(lookup(&[
            ("LLM_TEXT_DEFAULT_MODEL", "gpt-4o-mini"),
            ("LLM_TEXT_TEMPERATURE", " 0.7 "),
            ("LLM_TEXT_SCHEMA_STRICTNESS", "Strict"),
            ("LLM_TEXT_KEY_POINTS_MODEL", "summarizer"),
            ("LLM_TEXT_COMPARE_MODEL", ""),
        ]))
        .unwrap();

        assert_eq!(config.default_model(), Some("gpt-4o-mini"));
        assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.schema_strictness(), SchemaStrictness::Strict);
        assert_eq!(config.model_override(Operation::KeyPoints), Some("summarizer"));
        assert_eq!(config.model_override(Operation::Compare), None);
    }

    #[test]
    fn rejects_bad_environment_values() {
        let err = TextConfig::from_lookup(lookup(&[("LLM_TEXT_TEMPERATURE", "warm")]))
            .expect_err("not a float");
        assert!(err.to_string().contains("LLM_TEXT_TEMPERATURE"));

        let err = TextConfig::from_lookup(lookup(&[("LLM_TEXT_SCHEMA_STRICTNESS", "loose")]))
            .expect_err("unknown strictness");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn decodes_json_with_defaults() {
        let config = TextConfig::from_json_str(
            r#"{
                "default_model": "gpt-4o",
                "model_overrides": { "detect_language": "tiny" },
                "schema_strictness": "strict"
            }"#,
        )
        .unwrap();

        assert!((config.temperature() - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(config.model_for(Operation::DetectLanguage), Some("tiny"));
        assert_eq!(config.schema_strictness(), SchemaStrictness::Strict);

        let err = TextConfig::from_json_str(r#"{"temperature": 9.0}"#).expect_err("range");
        assert!(matches!(err, ConfigError::InvalidTemperature { .. }));
    }
}
