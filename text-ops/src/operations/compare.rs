//! Pairwise text comparison.

use serde_json::{Value, json};
use text_primitives::{
    FieldSpec, FieldType, ItemType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

const PROMPT: &str = "Compare the following two texts:

{{instruction}}

Text 1:
{{text1}}

Text 2:
{{text2}}
";

const SIMILARITY: &str = "Compare the two texts and provide:
- A similarity score from 0 to 1 (where 1 is identical and 0 is completely different)
- The type of similarity detected (semantic, structural, topical, etc.)
- A brief summary of what makes them similar or different

Focus on semantic similarity: texts with the same meaning should score high even if worded differently.";

const DETAILED: &str = "Provide a detailed comparison including:
- Overall similarity score from 0 to 1
- Specific differences between the texts (tone, style, content, structure, etc.)
- Common elements or themes found in both texts
- A summary of the key similarities and differences

Analyze style, tone, content, structure, and intent.";

const CHANGES: &str = "Analyze the texts as if the second text is a revision of the first and provide:
- Overall similarity score from 0 to 1
- Types of changes made (additions, deletions, modifications, restructuring)
- Specific examples of what was changed
- Assessment of whether the changes improve or alter the content significantly

Focus on tracking edits and revisions between the versions.";

/// Message stored in the fallback result.
pub const PARSE_FAILURE: &str = "Failed to parse comparison result";

/// Kind of comparison to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComparisonType {
    /// Similarity score, type and summary.
    #[default]
    Similarity,
    /// Differences, commonalities and summary.
    Detailed,
    /// Treats the second text as a revision of the first.
    Changes,
}

impl ComparisonType {
    /// Lowercase name reported in results.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Similarity => "similarity",
            Self::Detailed => "detailed",
            Self::Changes => "changes",
        }
    }

    const fn instruction(self) -> &'static str {
        match self {
            Self::Similarity => SIMILARITY,
            Self::Detailed => DETAILED,
            Self::Changes => CHANGES,
        }
    }

    fn schema(self) -> Result<SchemaSpec> {
        let strings = FieldType::Array(ItemType::String);
        let builder = SchemaSpec::builder()
            .field(FieldSpec::new("similarity", FieldType::Number).required())
            .field(FieldSpec::new("comparison_type", FieldType::String).required());
        let builder = match self {
            Self::Similarity => builder
                .field(FieldSpec::new("similarity_type", FieldType::String))
                .field(FieldSpec::new("summary", FieldType::String)),
            Self::Detailed => builder
                .field(FieldSpec::new("differences", strings))
                .field(FieldSpec::new("commonalities", strings))
                .field(FieldSpec::new("summary", FieldType::String)),
            Self::Changes => builder
                .field(FieldSpec::new("change_types", strings))
                .field(FieldSpec::new("examples", strings))
                .field(FieldSpec::new("assessment", FieldType::String)),
        };
        builder.build()
    }
}

/// Options for [`TextClient::compare`](crate::TextClient::compare).
#[derive(Clone, Debug, Default)]
pub struct CompareOptions {
    comparison_type: ComparisonType,
    call: CallOptions,
}

impl CompareOptions {
    /// Similarity comparison.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comparison type.
    #[must_use]
    pub fn with_comparison_type(mut self, comparison_type: ComparisonType) -> Self {
        self.comparison_type = comparison_type;
        self
    }
}

call_options!(CompareOptions);

pub(crate) fn build_prompt(text1: &str, text2: &str, options: &CompareOptions) -> Result<String> {
    render(
        PROMPT,
        &["text1", "text2"],
        &[
            ("text1", text1),
            ("text2", text2),
            ("instruction", options.comparison_type.instruction()),
        ],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text1: &str,
    text2: &str,
    options: &CompareOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text1, "text1")?;
    validation::validate_text(text2, "text2")?;
    let prompt = build_prompt(text1, text2, options)?;

    let kind = options.comparison_type;
    let schema = SchemaInput::Spec(kind.schema()?);
    let reply = gateway
        .invoke(Operation::Compare, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::without_text()
        .with_fallback_field("similarity", Value::Null)
        .with_fallback_field("comparison_type", json!(kind.as_str()))
        .with_fallback_field("error", json!(PARSE_FAILURE));
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_fields_depend_on_type() {
        let names = |kind: ComparisonType| -> Vec<String> {
            kind.schema()
                .unwrap()
                .field_names()
                .map(str::to_owned)
                .collect()
        };
        assert_eq!(
            names(ComparisonType::Similarity),
            ["similarity", "comparison_type", "similarity_type", "summary"]
        );
        assert_eq!(names(ComparisonType::Changes)[2], "change_types");
    }

    #[test]
    fn prompt_places_both_texts() {
        let options = CompareOptions::new().with_comparison_type(ComparisonType::Detailed);
        let prompt = build_prompt("first", "second", &options).unwrap();
        assert!(prompt.contains("Provide a detailed comparison"));
        assert!(prompt.ends_with("Text 1:\nfirst\n\nText 2:\nsecond\n"));
    }
}
