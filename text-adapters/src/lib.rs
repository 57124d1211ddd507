//! Chat model adapters consumed by the text operation gateway.
//!
//! Each provider module implements the [`traits::ModelAdapter`] interface.
//! The gateway only ever sees the trait, so any chat client can be plugged in.

#![warn(missing_docs, clippy::pedantic)]

pub mod ollama;
pub mod openai;
pub mod traits;

mod transport;

pub use traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    MessageRole, ModelAdapter, PromptMessage,
};
