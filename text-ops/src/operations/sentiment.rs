//! Sentiment labelling with an optional confidence score.

use serde_json::Value;
use text_primitives::{
    FieldSpec, FieldType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

/// Labels used when none are supplied.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["positive", "negative", "neutral"];

const PROMPT: &str = "Analyze the sentiment of the following text.

Categories: {{categories}}

{{output}}

Text:
{{text}}
";

const SIMPLE_OUTPUT: &str = "Return only the sentiment category name, nothing else.";

const SCORED_OUTPUT: &str = "Return a JSON object with:
- \"label\": the sentiment category
- \"confidence\": a confidence score between 0 and 1 (where 1 is completely confident)";

/// Options for [`TextClient::sentiment`](crate::TextClient::sentiment).
#[derive(Clone, Debug)]
pub struct SentimentOptions {
    categories: Vec<String>,
    simple: bool,
    call: CallOptions,
}

impl Default for SentimentOptions {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect(),
            simple: false,
            call: CallOptions::default(),
        }
    }
}

impl SentimentOptions {
    /// Scored sentiment over the default categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candidate labels.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Returns only the label as text when `true`.
    #[must_use]
    pub fn with_simple(mut self, simple: bool) -> Self {
        self.simple = simple;
        self
    }
}

call_options!(SentimentOptions);

fn schema(categories: &[String]) -> Result<SchemaSpec> {
    SchemaSpec::builder()
        .field(
            FieldSpec::new("label", FieldType::String)
                .required()
                .with_enum(categories.iter().cloned()),
        )
        .field(
            FieldSpec::new("confidence", FieldType::Number)
                .required()
                .with_description("score between 0 and 1"),
        )
        .build()
}

pub(crate) fn build_prompt(text: &str, options: &SentimentOptions) -> Result<String> {
    let categories = options.categories.join(", ");
    let output = if options.simple {
        SIMPLE_OUTPUT
    } else {
        SCORED_OUTPUT
    };
    render(
        PROMPT,
        &["text", "categories"],
        &[("text", text), ("categories", &categories), ("output", output)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &SentimentOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    validation::validate_list(&options.categories, "categories", 1)?;
    let prompt = build_prompt(text, options)?;

    if options.simple {
        let reply = gateway
            .invoke(Operation::Sentiment, prompt, &options.call, None)
            .await?;
        return Ok(ParsedResult::Text(reply.trim().to_owned()));
    }

    let schema = SchemaInput::Spec(schema(&options.categories)?);
    let reply = gateway
        .invoke(Operation::Sentiment, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::new("label").with_fallback_field("confidence", Value::Null);
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_categories_in_prompt() {
        let prompt = build_prompt("I love it", &SentimentOptions::new()).unwrap();
        assert!(prompt.contains("Categories: positive, negative, neutral\n"));
        assert!(prompt.contains("\"confidence\""));
    }

    #[test]
    fn label_is_restricted_to_categories() {
        let schema = schema(&["happy".to_owned(), "sad".to_owned()]).unwrap();
        let label = schema.field("label").unwrap();
        assert_eq!(
            label.allowed_values(),
            Some(&["happy".to_owned(), "sad".to_owned()][..])
        );
    }
}
