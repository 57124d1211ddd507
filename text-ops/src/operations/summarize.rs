//! Summaries of a requested length.

use text_primitives::{Operation, Result, validation};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Summarize the following text.
Length: {{length}}{{word_limit}}
Return only the summary, with no preamble or explanation.

Text:
{{text}}
";

/// Target length of a summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SummaryLength {
    /// One or two sentences.
    Short,
    /// Three to five sentences.
    #[default]
    Medium,
    /// One or two paragraphs.
    Detailed,
    /// Free-form length instruction.
    Custom(String),
}

impl SummaryLength {
    fn instruction(&self) -> &str {
        match self {
            Self::Short => "1-2 sentences",
            Self::Medium => "3-5 sentences",
            Self::Detailed => "1-2 paragraphs",
            Self::Custom(instruction) => instruction,
        }
    }
}

/// Options for [`TextClient::summarize`](crate::TextClient::summarize).
#[derive(Clone, Debug, Default)]
pub struct SummarizeOptions {
    length: SummaryLength,
    max_words: Option<u32>,
    call: CallOptions,
}

impl SummarizeOptions {
    /// Default options: a medium summary with no word cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary length.
    #[must_use]
    pub fn with_length(mut self, length: SummaryLength) -> Self {
        self.length = length;
        self
    }

    /// Caps the summary at `max_words`.
    #[must_use]
    pub fn with_max_words(mut self, max_words: u32) -> Self {
        self.max_words = Some(max_words);
        self
    }
}

call_options!(SummarizeOptions);

pub(crate) fn build_prompt(text: &str, options: &SummarizeOptions) -> Result<String> {
    let word_limit = options
        .max_words
        .map(|max| format!(" (maximum {max} words)"))
        .unwrap_or_default();
    render(
        PROMPT,
        &["text"],
        &[
            ("text", text),
            ("length", options.length.instruction()),
            ("word_limit", &word_limit),
        ],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &SummarizeOptions,
) -> Result<String> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::Summarize, prompt, &options.call, None)
        .await?;
    Ok(reply.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_defaults_to_medium() {
        let prompt = build_prompt("Rust is fast.", &SummarizeOptions::new()).unwrap();
        assert!(prompt.contains("Length: 3-5 sentences\n"));
        assert!(prompt.ends_with("Text:\nRust is fast.\n"));
    }

    #[test]
    fn prompt_carries_word_limit_and_custom_length() {
        let options = SummarizeOptions::new()
            .with_length(SummaryLength::Custom("one tweet".into()))
            .with_max_words(20);
        let prompt = build_prompt("Rust is fast.", &options).unwrap();
        assert!(prompt.contains("Length: one tweet (maximum 20 words)"));
    }
}
