//! Tone and style rewrites.

use text_primitives::{Operation, Result, validation};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Rewrite the following text according to these requirements:

{{requirements}}

Return only the rewritten text, with no explanation or commentary.

Text:
{{text}}
";

/// Voice of the rewritten text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Friendly and informal.
    Casual,
    /// Polished business register.
    Professional,
    /// Scholarly and precise.
    Academic,
    /// Descriptive and imaginative.
    Creative,
    /// Brief and direct.
    Concise,
    /// Free-form description.
    Custom(String),
}

impl Tone {
    fn description(&self) -> &str {
        match self {
            Self::Casual => "friendly, informal, and conversational",
            Self::Professional => "business-appropriate, formal, and polished",
            Self::Academic => "scholarly, formal, and precise",
            Self::Creative => "engaging, descriptive, and imaginative",
            Self::Concise => "brief, direct, and to-the-point",
            Self::Custom(description) => description,
        }
    }
}

/// Structural change applied by the rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Style {
    /// Shorter, keeping the meaning.
    Concise,
    /// Longer, with context and examples.
    Detailed,
    /// Formal vocabulary.
    Formal,
    /// Informal vocabulary.
    Casual,
    /// Free-form description.
    Custom(String),
}

impl Style {
    fn description(&self) -> &str {
        match self {
            Self::Concise => "Make it shorter and more direct while preserving meaning",
            Self::Detailed => "Expand with more context, examples, and explanation",
            Self::Formal => "Use formal language and professional terminology",
            Self::Casual => "Use informal, friendly language",
            Self::Custom(description) => description,
        }
    }
}

/// Options for [`TextClient::rewrite`](crate::TextClient::rewrite).
///
/// At least one of tone, style or instruction must be set.
#[derive(Clone, Debug, Default)]
pub struct RewriteOptions {
    tone: Option<Tone>,
    style: Option<Style>,
    instruction: Option<String>,
    call: CallOptions,
}

impl RewriteOptions {
    /// Creates options with no transformation selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Adds a free-form instruction.
    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}

call_options!(RewriteOptions);

pub(crate) fn build_prompt(text: &str, options: &RewriteOptions) -> Result<String> {
    let mut requirements = Vec::new();
    if let Some(tone) = &options.tone {
        requirements.push(format!("Tone: {}", tone.description()));
    }
    if let Some(style) = &options.style {
        requirements.push(format!("Style: {}", style.description()));
    }
    if let Some(instruction) = &options.instruction {
        requirements.push(format!("Additional instruction: {instruction}"));
    }
    let requirements = requirements.join("\n");
    render(
        PROMPT,
        &["text", "requirements"],
        &[("text", text), ("requirements", &requirements)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &RewriteOptions,
) -> Result<String> {
    validation::validate_text(text, "text")?;
    validation::validate_one_of(
        &[
            options.tone.is_some(),
            options.style.is_some(),
            options.instruction.is_some(),
        ],
        &["tone", "style", "instruction"],
    )?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::Rewrite, prompt, &options.call, None)
        .await?;
    Ok(reply.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_each_requirement() {
        let options = RewriteOptions::new()
            .with_tone(Tone::Professional)
            .with_style(Style::Custom("bullet points".into()))
            .with_instruction("mention the deadline");
        let prompt = build_prompt("hey, ship it", &options).unwrap();
        assert!(prompt.contains(
            "Tone: business-appropriate, formal, and polished\n\
             Style: bullet points\n\
             Additional instruction: mention the deadline"
        ));
    }
}
