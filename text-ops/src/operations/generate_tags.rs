//! Tag generation.

use text_primitives::{Operation, Result, validation};

use super::{render, reply_lines, strip_bullet, strip_number};
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Analyze the following text and generate relevant tags{{limit}}.
{{style}}
{{format}}

Return only the tags, one per line, with no preamble or explanation.
Each tag should be on a separate line.

Text:
{{text}}
";

/// Kind of tag requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagStyle {
    /// Keywords and key phrases.
    #[default]
    Keywords,
    /// Broad subject areas.
    Topics,
    /// `#hashtag` tags.
    Hashtags,
}

impl TagStyle {
    const fn instruction(self) -> &'static str {
        match self {
            Self::Keywords => {
                "Generate relevant keywords and key phrases that capture the main topics and concepts."
            }
            Self::Topics => {
                "Generate broader topic categories and subject areas covered in the content."
            }
            Self::Hashtags => {
                "Generate hashtag-style tags suitable for social media (include the # symbol)."
            }
        }
    }

    const fn format(self) -> &'static str {
        match self {
            Self::Hashtags => "Format each tag as a hashtag (e.g., #rust, #programming).",
            Self::Keywords | Self::Topics => {
                "Return simple words or short phrases without special formatting."
            }
        }
    }
}

/// Options for [`TextClient::generate_tags`](crate::TextClient::generate_tags).
#[derive(Clone, Debug, Default)]
pub struct GenerateTagsOptions {
    max_tags: Option<u32>,
    style: TagStyle,
    call: CallOptions,
}

impl GenerateTagsOptions {
    /// Keywords with no tag limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of tags requested.
    #[must_use]
    pub fn with_max_tags(mut self, max_tags: u32) -> Self {
        self.max_tags = Some(max_tags);
        self
    }

    /// Sets the tag style.
    #[must_use]
    pub fn with_style(mut self, style: TagStyle) -> Self {
        self.style = style;
        self
    }
}

call_options!(GenerateTagsOptions);

pub(crate) fn build_prompt(text: &str, options: &GenerateTagsOptions) -> Result<String> {
    let limit = options
        .max_tags
        .map(|max| format!(" (maximum {max} tags)"))
        .unwrap_or_default();
    render(
        PROMPT,
        &["text"],
        &[
            ("text", text),
            ("limit", &limit),
            ("style", options.style.instruction()),
            ("format", options.style.format()),
        ],
    )
}

fn strip_quotes(tag: &str) -> &str {
    let tag = tag.strip_prefix(['"', '\'']).unwrap_or(tag);
    tag.strip_suffix(['"', '\'']).unwrap_or(tag)
}

/// Normalizes a tag reply: markers and quotes go, comma lists are split
/// (hashtag lines excepted) and duplicates are dropped in order.
pub(crate) fn parse_tags(reply: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push = |tag: &str| {
        if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_owned());
        }
    };

    for line in reply_lines(reply) {
        let cleaned = strip_quotes(strip_number(strip_bullet(line)));
        if cleaned.contains(',') && !cleaned.starts_with('#') {
            for part in cleaned.split(',') {
                push(strip_quotes(part.trim()));
            }
        } else {
            push(cleaned);
        }
    }

    tags
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &GenerateTagsOptions,
) -> Result<Vec<String>> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::GenerateTags, prompt, &options.call, None)
        .await?;
    Ok(parse_tags(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_and_deduplicates_tags() {
        let reply = "- rust\n2. \"systems programming\"\n\n'rust'\nmemory safety, speed , \"rust\"\n";
        assert_eq!(
            parse_tags(reply),
            ["rust", "systems programming", "memory safety", "speed"]
        );
    }

    #[test]
    fn hashtag_lines_are_not_split() {
        assert_eq!(parse_tags("#rust, #async\n#tokio"), ["#rust, #async", "#tokio"]);
    }

    #[test]
    fn hashtag_prompt_asks_for_symbol() {
        let prompt = build_prompt(
            "text",
            &GenerateTagsOptions::new()
                .with_style(TagStyle::Hashtags)
                .with_max_tags(5),
        )
        .unwrap();
        assert!(prompt.contains("relevant tags (maximum 5 tags)."));
        assert!(prompt.contains("include the # symbol"));
    }
}
