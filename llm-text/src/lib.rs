//! LLM-backed text operations.
//!
//! Depend on this crate to get [`TextClient`] together with its
//! configuration, adapters and shared types. Prompt templates and the
//! logging setup sit behind the `prompts` and `telemetry` features.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use llm_text::adapters::ollama::{OllamaAdapter, OllamaConfig};
//! use llm_text::{ClassifyOptions, TextClient, TextConfig};
//!
//! # async fn run() -> llm_text::Result<()> {
//! let adapter = OllamaAdapter::new(OllamaConfig::new("llama3.2"))
//!     .map_err(llm_text::Error::llm_call)?;
//! let client = TextClient::new(Arc::new(adapter), TextConfig::default());
//! let label = client
//!     .classify("I love it", &ClassifyOptions::new(["positive", "negative"]))
//!     .await?;
//! println!("{label}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, clippy::pedantic)]

/// Shared error, schema and validation types.
pub use text_primitives as primitives;

/// Model and temperature configuration.
pub use text_config as config;

/// Chat model adapters.
pub use text_adapters as adapters;

/// Operations, gateway and result pipeline.
pub use text_ops as ops;

/// Prompt templates (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use text_prompts as prompts;

/// Tracing subscriber setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use text_telemetry as telemetry;

pub use text_config::TextConfig;
pub use text_ops::*;
pub use text_primitives::{Error, Result, SchemaInput, SchemaSpec};
