//! Key point extraction as a list of strings.

use text_primitives::{Operation, Result, validation};

use super::{render, reply_lines, strip_bullet, strip_number};
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Extract the key points from the following text{{limit}}.
{{format}}
Return only the key points, with no preamble or explanation.
Each point should be on a separate line.

Text:
{{text}}
";

/// How the model is asked to mark each point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointFormat {
    /// One sentence per line.
    #[default]
    Sentences,
    /// `•` bullets.
    Bullets,
    /// `1.` numbering.
    Numbers,
}

impl PointFormat {
    const fn instruction(self) -> &'static str {
        match self {
            Self::Sentences => "Format as complete sentences, one per line.",
            Self::Bullets => "Format each point with a bullet (•) at the start.",
            Self::Numbers => "Format as a numbered list (1. 2. 3. etc.).",
        }
    }
}

/// Options for [`TextClient::key_points`](crate::TextClient::key_points).
#[derive(Clone, Debug, Default)]
pub struct KeyPointsOptions {
    max_points: Option<u32>,
    format: PointFormat,
    call: CallOptions,
}

impl KeyPointsOptions {
    /// Sentences with no point limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of points requested.
    #[must_use]
    pub fn with_max_points(mut self, max_points: u32) -> Self {
        self.max_points = Some(max_points);
        self
    }

    /// Sets the list format.
    #[must_use]
    pub fn with_format(mut self, format: PointFormat) -> Self {
        self.format = format;
        self
    }
}

call_options!(KeyPointsOptions);

pub(crate) fn build_prompt(text: &str, options: &KeyPointsOptions) -> Result<String> {
    let limit = options
        .max_points
        .map(|max| format!(" (maximum {max} points)"))
        .unwrap_or_default();
    render(
        PROMPT,
        &["text"],
        &[
            ("text", text),
            ("limit", &limit),
            ("format", options.format.instruction()),
        ],
    )
}

pub(crate) fn parse_points(reply: &str, format: PointFormat) -> Vec<String> {
    reply_lines(reply)
        .map(|line| match format {
            PointFormat::Bullets => strip_bullet(line),
            PointFormat::Numbers => strip_number(line),
            PointFormat::Sentences => line,
        })
        .map(str::to_owned)
        .collect()
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &KeyPointsOptions,
) -> Result<Vec<String>> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::KeyPoints, prompt, &options.call, None)
        .await?;
    Ok(parse_points(&reply, options.format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markers_for_the_requested_format() {
        let reply = "• First point\n\n* Second point\n- Third point\n";
        assert_eq!(
            parse_points(reply, PointFormat::Bullets),
            ["First point", "Second point", "Third point"]
        );
        assert_eq!(
            parse_points("1. One\n2. Two\n10. Ten", PointFormat::Numbers),
            ["One", "Two", "Ten"]
        );
        assert_eq!(
            parse_points("- kept as is\nSecond.", PointFormat::Sentences),
            ["- kept as is", "Second."]
        );
    }

    #[test]
    fn prompt_mentions_limit() {
        let prompt = build_prompt(
            "long text",
            &KeyPointsOptions::new()
                .with_max_points(3)
                .with_format(PointFormat::Numbers),
        )
        .unwrap();
        assert!(prompt.starts_with("Extract the key points from the following text (maximum 3 points).\n"));
        assert!(prompt.contains("numbered list"));
    }
}
