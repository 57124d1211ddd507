//! Prompt templating for text operations.

#![warn(missing_docs, clippy::pedantic)]

pub mod template;

pub use template::{PromptTemplate, TemplateBuilder, TemplateError, TemplateResult};
