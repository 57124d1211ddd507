//! Schema-driven field extraction.

use text_primitives::{Operation, Result, SchemaInput, validation};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

const PROMPT: &str = "Extract the following information from the text: {{fields}}
Return the data as structured JSON matching the provided schema.

Text:
{{text}}
";

/// Options for [`TextClient::extract`](crate::TextClient::extract).
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    schema: SchemaInput,
    call: CallOptions,
}

impl ExtractOptions {
    /// Extracts the fields described by `schema`.
    #[must_use]
    pub fn new(schema: impl Into<SchemaInput>) -> Self {
        Self {
            schema: schema.into(),
            call: CallOptions::default(),
        }
    }

    /// Schema as supplied by the caller.
    #[must_use]
    pub fn schema(&self) -> &SchemaInput {
        &self.schema
    }
}

call_options!(ExtractOptions);

pub(crate) fn build_prompt(text: &str, fields: &[&str]) -> Result<String> {
    let fields = fields.join(", ");
    render(
        PROMPT,
        &["text", "fields"],
        &[("text", text), ("fields", &fields)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &ExtractOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    let spec = gateway.normalize_schema(&options.schema)?;

    let fields: Vec<&str> = spec.field_names().collect();
    let prompt = build_prompt(text, &fields)?;
    let shape = ResultShape::new("text").with_schema_booleans(&spec);

    let reply = gateway
        .invoke(
            Operation::Extract,
            prompt,
            &options.call,
            Some(&SchemaInput::Spec(spec.clone())),
        )
        .await?;

    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_fields_in_order() {
        let prompt = build_prompt("John is 30", &["name", "age"]).unwrap();
        assert!(prompt.starts_with("Extract the following information from the text: name, age\n"));
    }
}
