//! Question answering grounded in the supplied text.

use serde_json::Value;
use text_primitives::{
    FieldSpec, FieldType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build, is_boolean_question, parse_boolean};

const PROMPT: &str = "Based on the following text, answer this question: \"{{question}}\"

{{output}}

Text:
{{text}}
";

const PLAIN_OUTPUT: &str = "Answer the question based only on the information provided in the text.
For yes/no questions, respond with true or false.
If the answer cannot be found in the text, respond with \"information not available\".
Return only the answer, no explanation.";

const SCORED_OUTPUT: &str = "Return a JSON object with:
- \"answer\": the answer to the question (use true/false for yes/no questions)
- \"confidence\": a confidence score between 0 and 1

If the answer cannot be found in the text, return \"information not available\" as the answer with low confidence.";

/// Options for [`TextClient::answer`](crate::TextClient::answer).
#[derive(Clone, Debug)]
pub struct AnswerOptions {
    question: String,
    include_confidence: bool,
    call: CallOptions,
}

impl AnswerOptions {
    /// Answers `question`.
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            include_confidence: false,
            call: CallOptions::default(),
        }
    }

    /// Requests `{answer, confidence}` instead of a bare answer.
    #[must_use]
    pub fn with_confidence(mut self, include_confidence: bool) -> Self {
        self.include_confidence = include_confidence;
        self
    }

    /// Question being asked.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }
}

call_options!(AnswerOptions);

fn schema(question: &str) -> Result<SchemaSpec> {
    let answer_type = if is_boolean_question(question) {
        FieldType::Boolean
    } else {
        FieldType::String
    };
    SchemaSpec::builder()
        .field(FieldSpec::new("answer", answer_type).required())
        .field(FieldSpec::new("confidence", FieldType::Number).required())
        .build()
}

pub(crate) fn build_prompt(text: &str, options: &AnswerOptions) -> Result<String> {
    let output = if options.include_confidence {
        SCORED_OUTPUT
    } else {
        PLAIN_OUTPUT
    };
    render(
        PROMPT,
        &["text", "question"],
        &[("text", text), ("question", &options.question), ("output", output)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &AnswerOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    validation::validate_text(&options.question, "question")?;
    let prompt = build_prompt(text, options)?;

    if !options.include_confidence {
        let reply = gateway
            .invoke(Operation::Answer, prompt, &options.call, None)
            .await?;
        let reply = reply.trim();
        if is_boolean_question(&options.question) {
            if let Some(answer) = parse_boolean(reply) {
                return Ok(ParsedResult::Boolean(answer));
            }
        }
        return Ok(ParsedResult::Text(reply.to_owned()));
    }

    let schema = SchemaInput::Spec(schema(&options.question)?);
    let reply = gateway
        .invoke(Operation::Answer, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::new("answer")
        .with_fallback_field("confidence", Value::Null)
        .with_boolean_field("answer");
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_type_follows_question() {
        let yes_no = schema("Is Rust memory safe?").unwrap();
        assert_eq!(yes_no.field("answer").unwrap().field_type(), FieldType::Boolean);

        let open = schema("Who wrote it?").unwrap();
        assert_eq!(open.field("answer").unwrap().field_type(), FieldType::String);
    }

    #[test]
    fn prompt_quotes_question() {
        let prompt = build_prompt("Text", &AnswerOptions::new("Who?")).unwrap();
        assert!(prompt.starts_with("Based on the following text, answer this question: \"Who?\""));
    }
}
