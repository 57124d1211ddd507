//! Grammar and spelling correction.

use serde_json::json;
use text_primitives::{
    FieldSpec, FieldType, ItemType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

const PROMPT: &str = "Fix grammar, spelling, punctuation, and word choice errors in the following text.
{{style}}

{{output}}

Text:
{{text}}
";

const PRESERVE_STYLE: &str = "Preserve the original tone, style, and level of formality.";

const PLAIN_OUTPUT: &str =
    "Return only the corrected text with no explanation or additional commentary.";

const EXPLAINED_OUTPUT: &str = "Return a JSON object with:
- \"corrected\": the corrected text
- \"changes\": an array of changes made (e.g., \"their → they're\", \"tommorow → tomorrow\")";

/// Options for [`TextClient::fix_grammar`](crate::TextClient::fix_grammar).
#[derive(Clone, Debug, Default)]
pub struct GrammarOptions {
    explain: bool,
    preserve_style: bool,
    call: CallOptions,
}

impl GrammarOptions {
    /// Plain correction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `{corrected, changes}` instead of plain text.
    #[must_use]
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Asks the model to keep the original tone.
    #[must_use]
    pub fn with_preserve_style(mut self, preserve_style: bool) -> Self {
        self.preserve_style = preserve_style;
        self
    }
}

call_options!(GrammarOptions);

fn schema() -> Result<SchemaSpec> {
    SchemaSpec::builder()
        .field(FieldSpec::new("corrected", FieldType::String).required())
        .field(FieldSpec::new("changes", FieldType::Array(ItemType::String)).required())
        .build()
}

pub(crate) fn build_prompt(text: &str, options: &GrammarOptions) -> Result<String> {
    let style = if options.preserve_style { PRESERVE_STYLE } else { "" };
    let output = if options.explain {
        EXPLAINED_OUTPUT
    } else {
        PLAIN_OUTPUT
    };
    render(
        PROMPT,
        &["text"],
        &[("text", text), ("style", style), ("output", output)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &GrammarOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;

    if !options.explain {
        let reply = gateway
            .invoke(Operation::Grammar, prompt, &options.call, None)
            .await?;
        return Ok(ParsedResult::Text(reply.trim().to_owned()));
    }

    let schema = SchemaInput::Spec(schema()?);
    let reply = gateway
        .invoke(Operation::Grammar, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::new("corrected").with_fallback_field("changes", json!([]));
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_switches_output_instruction() {
        let plain = build_prompt("teh cat", &GrammarOptions::new()).unwrap();
        assert!(plain.contains(PLAIN_OUTPUT));
        assert!(!plain.contains(PRESERVE_STYLE));

        let explained = build_prompt(
            "teh cat",
            &GrammarOptions::new().with_explain(true).with_preserve_style(true),
        )
        .unwrap();
        assert!(explained.contains("\"changes\""));
        assert!(explained.contains(PRESERVE_STYLE));
    }

    #[test]
    fn schema_requires_both_fields() {
        let schema = schema().unwrap();
        assert!(schema.fields().iter().all(FieldSpec::is_required));
    }
}
