//! Method-call syntax for text operations on string slices.
//!
//! ```no_run
//! # async fn demo(client: &text_ops::TextClient) -> text_primitives::Result<()> {
//! use text_ops::{SummarizeOptions, TextExt};
//!
//! let summary = "A long article ...".summarize(client, &SummarizeOptions::new()).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use text_primitives::Result;

use crate::{
    AnonymizeOptions, AnswerOptions, ClassifyOptions, CompareOptions, DetectLanguageOptions,
    ExtractOptions, GenerateTagsOptions, GrammarOptions, KeyPointsOptions, ParsedResult,
    RewriteOptions, SentimentOptions, SummarizeOptions, TextClient, TranslateOptions,
};

/// Runs [`TextClient`] operations with the receiver as the input text.
///
/// Every method forwards to the client method of the same name.
#[async_trait]
pub trait TextExt {
    /// See [`TextClient::summarize`].
    async fn summarize(&self, client: &TextClient, options: &SummarizeOptions) -> Result<String>;

    /// See [`TextClient::translate`].
    async fn translate(&self, client: &TextClient, options: &TranslateOptions) -> Result<String>;

    /// See [`TextClient::extract`].
    async fn extract(&self, client: &TextClient, options: &ExtractOptions) -> Result<ParsedResult>;

    /// See [`TextClient::classify`].
    async fn classify(&self, client: &TextClient, options: &ClassifyOptions) -> Result<String>;

    /// See [`TextClient::fix_grammar`].
    async fn fix_grammar(
        &self,
        client: &TextClient,
        options: &GrammarOptions,
    ) -> Result<ParsedResult>;

    /// See [`TextClient::sentiment`].
    async fn sentiment(
        &self,
        client: &TextClient,
        options: &SentimentOptions,
    ) -> Result<ParsedResult>;

    /// See [`TextClient::key_points`].
    async fn key_points(
        &self,
        client: &TextClient,
        options: &KeyPointsOptions,
    ) -> Result<Vec<String>>;

    /// See [`TextClient::rewrite`].
    async fn rewrite(&self, client: &TextClient, options: &RewriteOptions) -> Result<String>;

    /// See [`TextClient::answer`].
    async fn answer(&self, client: &TextClient, options: &AnswerOptions) -> Result<ParsedResult>;

    /// See [`TextClient::detect_language`].
    async fn detect_language(
        &self,
        client: &TextClient,
        options: &DetectLanguageOptions,
    ) -> Result<ParsedResult>;

    /// See [`TextClient::generate_tags`].
    async fn generate_tags(
        &self,
        client: &TextClient,
        options: &GenerateTagsOptions,
    ) -> Result<Vec<String>>;

    /// See [`TextClient::anonymize`].
    async fn anonymize(
        &self,
        client: &TextClient,
        options: &AnonymizeOptions,
    ) -> Result<ParsedResult>;

    /// Compares the receiver with `other`. See [`TextClient::compare`].
    async fn compare(
        &self,
        other: &str,
        client: &TextClient,
        options: &CompareOptions,
    ) -> Result<ParsedResult>;
}

#[async_trait]
impl TextExt for str {
    async fn summarize(&self, client: &TextClient, options: &SummarizeOptions) -> Result<String> {
        client.summarize(self, options).await
    }

    async fn translate(&self, client: &TextClient, options: &TranslateOptions) -> Result<String> {
        client.translate(self, options).await
    }

    async fn extract(&self, client: &TextClient, options: &ExtractOptions) -> Result<ParsedResult> {
        client.extract(self, options).await
    }

    async fn classify(&self, client: &TextClient, options: &ClassifyOptions) -> Result<String> {
        client.classify(self, options).await
    }

    async fn fix_grammar(
        &self,
        client: &TextClient,
        options: &GrammarOptions,
    ) -> Result<ParsedResult> {
        client.fix_grammar(self, options).await
    }

    async fn sentiment(
        &self,
        client: &TextClient,
        options: &SentimentOptions,
    ) -> Result<ParsedResult> {
        client.sentiment(self, options).await
    }

    async fn key_points(
        &self,
        client: &TextClient,
        options: &KeyPointsOptions,
    ) -> Result<Vec<String>> {
        client.key_points(self, options).await
    }

    async fn rewrite(&self, client: &TextClient, options: &RewriteOptions) -> Result<String> {
        client.rewrite(self, options).await
    }

    async fn answer(&self, client: &TextClient, options: &AnswerOptions) -> Result<ParsedResult> {
        client.answer(self, options).await
    }

    async fn detect_language(
        &self,
        client: &TextClient,
        options: &DetectLanguageOptions,
    ) -> Result<ParsedResult> {
        client.detect_language(self, options).await
    }

    async fn generate_tags(
        &self,
        client: &TextClient,
        options: &GenerateTagsOptions,
    ) -> Result<Vec<String>> {
        client.generate_tags(self, options).await
    }

    async fn anonymize(
        &self,
        client: &TextClient,
        options: &AnonymizeOptions,
    ) -> Result<ParsedResult> {
        client.anonymize(self, options).await
    }

    async fn compare(
        &self,
        other: &str,
        client: &TextClient,
        options: &CompareOptions,
    ) -> Result<ParsedResult> {
        client.compare(self, other, options).await
    }
}
