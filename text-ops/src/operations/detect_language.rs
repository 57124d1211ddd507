//! Language identification.

use serde_json::Value;
use text_primitives::{
    FieldSpec, FieldType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

const PROMPT: &str = "Detect the language of the following text.

{{output}}

Text:
{{text}}
";

const PLAIN_OUTPUT: &str = "Return only the full language name (e.g., \"English\", \"French\", \"Spanish\").
If the language cannot be reliably detected, return \"unknown\".";

const SCORED_OUTPUT: &str = "Return a JSON object with:
- \"language\": the full language name (e.g., \"English\", \"French\", \"Spanish\")
- \"confidence\": a confidence score between 0 and 1
- \"code\": the ISO 639-1 language code (e.g., \"en\", \"fr\", \"es\")

If the language cannot be reliably detected, return \"unknown\" as the language with low confidence.";

/// Options for [`TextClient::detect_language`](crate::TextClient::detect_language).
#[derive(Clone, Debug, Default)]
pub struct DetectLanguageOptions {
    include_confidence: bool,
    call: CallOptions,
}

impl DetectLanguageOptions {
    /// Plain language name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `{language, confidence, code}`.
    #[must_use]
    pub fn with_confidence(mut self, include_confidence: bool) -> Self {
        self.include_confidence = include_confidence;
        self
    }
}

call_options!(DetectLanguageOptions);

fn schema() -> Result<SchemaSpec> {
    SchemaSpec::builder()
        .field(FieldSpec::new("language", FieldType::String).required())
        .field(FieldSpec::new("confidence", FieldType::Number).required())
        .field(
            FieldSpec::new("code", FieldType::String)
                .required()
                .with_description("ISO 639-1 code"),
        )
        .build()
}

pub(crate) fn build_prompt(text: &str, options: &DetectLanguageOptions) -> Result<String> {
    let output = if options.include_confidence {
        SCORED_OUTPUT
    } else {
        PLAIN_OUTPUT
    };
    render(PROMPT, &["text"], &[("text", text), ("output", output)])
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &DetectLanguageOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;

    if !options.include_confidence {
        let reply = gateway
            .invoke(Operation::DetectLanguage, prompt, &options.call, None)
            .await?;
        return Ok(ParsedResult::Text(reply.trim().to_owned()));
    }

    let schema = SchemaInput::Spec(schema()?);
    let reply = gateway
        .invoke(Operation::DetectLanguage, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::new("language")
        .with_fallback_field("confidence", Value::Null)
        .with_fallback_field("code", Value::Null);
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scored_prompt_asks_for_code() {
        let prompt =
            build_prompt("Hallo Welt", &DetectLanguageOptions::new().with_confidence(true))
                .unwrap();
        assert!(prompt.contains("ISO 639-1"));
        assert_eq!(schema().unwrap().fields().len(), 3);
    }
}
