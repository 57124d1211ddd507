//! Text operations built on a single model call.
//!
//! [`TextClient`] exposes one async method per operation. Each builds a
//! prompt, sends it through the [`ModelGateway`], and for structured
//! operations repairs the reply with [`repair::clean_json_response`] before
//! parsing it with [`result::build`].

#![warn(missing_docs, clippy::pedantic)]

pub mod ext;
pub mod gateway;
pub mod operations;
pub mod repair;
pub mod result;

use std::sync::Arc;

use text_adapters::ModelAdapter;
use text_config::TextConfig;
use text_primitives::Result;

pub use ext::TextExt;
pub use gateway::{CallOptions, ChatOption, ModelGateway};
pub use operations::anonymize::{AnonymizeOptions, PiiType, ReplacementStyle};
pub use operations::answer::AnswerOptions;
pub use operations::classify::ClassifyOptions;
pub use operations::compare::{CompareOptions, ComparisonType};
pub use operations::detect_language::DetectLanguageOptions;
pub use operations::extract::ExtractOptions;
pub use operations::generate_tags::{GenerateTagsOptions, TagStyle};
pub use operations::grammar::GrammarOptions;
pub use operations::key_points::{KeyPointsOptions, PointFormat};
pub use operations::rewrite::{RewriteOptions, Style, Tone};
pub use operations::sentiment::SentimentOptions;
pub use operations::summarize::{SummarizeOptions, SummaryLength};
pub use operations::translate::TranslateOptions;
pub use repair::clean_json_response;
pub use result::{ParsedResult, ResultShape};

/// Entry point for every text operation.
///
/// Each call validates its input, performs at most one model call and
/// awaits it. Configuration changes need `&mut self`.
#[derive(Clone, Debug)]
pub struct TextClient {
    gateway: ModelGateway,
}

impl TextClient {
    /// Creates a client that talks to `adapter` using `config`.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>, config: TextConfig) -> Self {
        Self {
            gateway: ModelGateway::new(adapter, config),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TextConfig {
        self.gateway.config()
    }

    /// Mutable configuration. Clones of this client keep their snapshot.
    pub fn config_mut(&mut self) -> &mut TextConfig {
        self.gateway.config_mut()
    }

    /// Gateway shared by the operations.
    #[must_use]
    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Summarizes `text`.
    ///
    /// # Errors
    ///
    /// Returns [`text_primitives::Error::Validation`] for empty text and
    /// [`text_primitives::Error::LlmCall`] if the model call fails.
    pub async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        operations::summarize::run(&self.gateway, text, options).await
    }

    /// Translates `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or target language, or
    /// [`text_primitives::Error::LlmCall`] if the model call fails.
    pub async fn translate(&self, text: &str, options: &TranslateOptions) -> Result<String> {
        operations::translate::run(&self.gateway, text, options).await
    }

    /// Extracts the schema fields from `text` into a mapping.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text, a schema error for a
    /// malformed schema, or [`text_primitives::Error::LlmCall`].
    pub async fn extract(&self, text: &str, options: &ExtractOptions) -> Result<ParsedResult> {
        operations::extract::run(&self.gateway, text, options).await
    }

    /// Picks one of the categories for `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or an empty category list,
    /// before any model call.
    pub async fn classify(&self, text: &str, options: &ClassifyOptions) -> Result<String> {
        operations::classify::run(&self.gateway, text, options).await
    }

    /// Corrects grammar and spelling.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn fix_grammar(&self, text: &str, options: &GrammarOptions) -> Result<ParsedResult> {
        operations::grammar::run(&self.gateway, text, options).await
    }

    /// Labels the sentiment of `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or categories, or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn sentiment(&self, text: &str, options: &SentimentOptions) -> Result<ParsedResult> {
        operations::sentiment::run(&self.gateway, text, options).await
    }

    /// Lists the key points of `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn key_points(&self, text: &str, options: &KeyPointsOptions) -> Result<Vec<String>> {
        operations::key_points::run(&self.gateway, text, options).await
    }

    /// Rewrites `text` in a new tone or style.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no transformation is selected.
    pub async fn rewrite(&self, text: &str, options: &RewriteOptions) -> Result<String> {
        operations::rewrite::run(&self.gateway, text, options).await
    }

    /// Answers a question about `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or question, or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn answer(&self, text: &str, options: &AnswerOptions) -> Result<ParsedResult> {
        operations::answer::run(&self.gateway, text, options).await
    }

    /// Identifies the language of `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn detect_language(
        &self,
        text: &str,
        options: &DetectLanguageOptions,
    ) -> Result<ParsedResult> {
        operations::detect_language::run(&self.gateway, text, options).await
    }

    /// Generates tags for `text`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn generate_tags(
        &self,
        text: &str,
        options: &GenerateTagsOptions,
    ) -> Result<Vec<String>> {
        operations::generate_tags::run(&self.gateway, text, options).await
    }

    /// Replaces personal data in `text` with tokens.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or
    /// [`text_primitives::Error::LlmCall`].
    pub async fn anonymize(&self, text: &str, options: &AnonymizeOptions) -> Result<ParsedResult> {
        operations::anonymize::run(&self.gateway, text, options).await
    }

    /// Compares `text1` with `text2`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming `text1` or `text2` when either is
    /// empty, or [`text_primitives::Error::LlmCall`].
    pub async fn compare(
        &self,
        text1: &str,
        text2: &str,
        options: &CompareOptions,
    ) -> Result<ParsedResult> {
        operations::compare::run(&self.gateway, text1, text2, options).await
    }
}
