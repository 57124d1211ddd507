//! Core shared types for the llm-text operation library.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod operation;
pub mod schema;
pub mod validation;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Identifier of each public text operation.
pub use operation::Operation;
/// Canonical schema representation and the normalizer entry point.
pub use schema::{
    FieldSpec, FieldType, ItemType, SchemaInput, SchemaSource, SchemaSpec, SchemaSpecBuilder,
    SchemaStrictness, normalize,
};
