//! PII redaction.

use serde_json::json;
use text_primitives::{
    FieldSpec, FieldType, Operation, Result, SchemaInput, SchemaSpec, validation,
};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};
use crate::repair::clean_json_response;
use crate::result::{ParsedResult, ResultShape, build};

const PROMPT: &str = "Anonymize the following text by replacing personally identifiable information (PII) with replacement tokens.

{{pii}}
{{replacements}}

{{output}}

Text:
{{text}}
";

const PLAIN_OUTPUT: &str = "Return only the anonymized text with PII replaced by appropriate tokens.
Do not include any explanation or notes.";

const MAPPED_OUTPUT: &str = "Return a JSON object with:
- \"text\": the anonymized text with PII replaced
- \"mapping\": an object mapping each replacement token to its original value

Example:
{
  \"text\": \"Contact [PERSON_1] at [EMAIL_1]\",
  \"mapping\": {
    \"[PERSON_1]\": \"John Doe\",
    \"[EMAIL_1]\": \"john.doe@example.com\"
  }
}";

/// Category of personal data to redact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PiiType {
    /// Personal names.
    Names,
    /// Email addresses.
    Emails,
    /// Phone numbers.
    Phones,
    /// Postal addresses.
    Addresses,
    /// Social Security Numbers.
    Ssn,
    /// Credit card numbers.
    CreditCards,
    /// Shorthand for [`PiiType::DEFAULT`].
    All,
}

impl PiiType {
    /// Types redacted by default.
    pub const DEFAULT: [Self; 4] = [Self::Names, Self::Emails, Self::Phones, Self::Addresses];

    fn expand(self) -> Vec<Self> {
        match self {
            Self::All => Self::DEFAULT.to_vec(),
            kind => vec![kind],
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::All => "Names, email addresses, phone numbers and physical addresses",
            Self::Names => "Names (personal names, full names, first names, last names)",
            Self::Emails => "Email addresses",
            Self::Phones => "Phone numbers (including various formats)",
            Self::Addresses => "Physical addresses (street addresses, cities, postal codes)",
            Self::Ssn => "Social Security Numbers",
            Self::CreditCards => "Credit card numbers",
        }
    }

    fn tokens(self, style: ReplacementStyle) -> Option<&'static str> {
        let tokens = match (style, self) {
            (ReplacementStyle::Generic, Self::Names) => {
                "Names: [PERSON], [PERSON_1], [PERSON_2], etc. for multiple people"
            }
            (ReplacementStyle::Generic, Self::Emails) => {
                "Emails: [EMAIL], [EMAIL_1], [EMAIL_2], etc. for multiple emails"
            }
            (ReplacementStyle::Generic, Self::Phones) => "Phones: [PHONE], [PHONE_1], [PHONE_2], etc.",
            (ReplacementStyle::Generic, Self::Addresses) => {
                "Addresses: [ADDRESS], [ADDRESS_1], [ADDRESS_2], etc."
            }
            (ReplacementStyle::Generic, Self::Ssn) => "SSN: [SSN], [SSN_1], [SSN_2], etc.",
            (ReplacementStyle::Generic, Self::CreditCards) => {
                "Credit Cards: [CREDIT_CARD], [CREDIT_CARD_1], etc."
            }
            (ReplacementStyle::Numbered, Self::Names) => "Names: [PERSON_1], [PERSON_2], etc.",
            (ReplacementStyle::Numbered, Self::Emails) => "Emails: [EMAIL_1], [EMAIL_2], etc.",
            (ReplacementStyle::Numbered, Self::Phones) => "Phones: [PHONE_1], [PHONE_2], etc.",
            (ReplacementStyle::Numbered, Self::Addresses) => {
                "Addresses: [ADDRESS_1], [ADDRESS_2], etc."
            }
            (ReplacementStyle::Descriptive, Self::Names) => {
                "Names: [FIRST_NAME], [LAST_NAME], [FULL_NAME]"
            }
            (ReplacementStyle::Descriptive, Self::Emails) => "Emails: [EMAIL_ADDRESS]",
            (ReplacementStyle::Descriptive, Self::Phones) => "Phones: [PHONE_NUMBER]",
            (ReplacementStyle::Descriptive, Self::Addresses) => {
                "Addresses: [STREET_ADDRESS], [CITY], [POSTAL_CODE]"
            }
            (ReplacementStyle::Numbered | ReplacementStyle::Descriptive, Self::Ssn | Self::CreditCards)
            | (_, Self::All) => {
                return None;
            }
        };
        Some(tokens)
    }
}

/// Token scheme used for replacements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplacementStyle {
    /// `[PERSON]`, `[EMAIL_1]`, ...
    #[default]
    Generic,
    /// Always numbered tokens.
    Numbered,
    /// Tokens naming the kind of value.
    Descriptive,
}

impl ReplacementStyle {
    const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Numbered => "numbered",
            Self::Descriptive => "descriptive",
        }
    }
}

/// Options for [`TextClient::anonymize`](crate::TextClient::anonymize).
#[derive(Clone, Debug)]
pub struct AnonymizeOptions {
    pii_types: Vec<PiiType>,
    replacement_style: ReplacementStyle,
    include_mapping: bool,
    call: CallOptions,
}

impl Default for AnonymizeOptions {
    fn default() -> Self {
        Self {
            pii_types: PiiType::DEFAULT.to_vec(),
            replacement_style: ReplacementStyle::default(),
            include_mapping: false,
            call: CallOptions::default(),
        }
    }
}

impl AnonymizeOptions {
    /// Generic tokens over the default PII types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the PII types to redact. An empty list selects the defaults
    /// and [`PiiType::All`] expands to them.
    #[must_use]
    pub fn with_pii_types<I>(mut self, pii_types: I) -> Self
    where
        I: IntoIterator<Item = PiiType>,
    {
        self.pii_types = pii_types.into_iter().flat_map(PiiType::expand).collect();
        if self.pii_types.is_empty() {
            self.pii_types = PiiType::DEFAULT.to_vec();
        }
        self
    }

    /// Sets the token scheme.
    #[must_use]
    pub fn with_replacement_style(mut self, style: ReplacementStyle) -> Self {
        self.replacement_style = style;
        self
    }

    /// Requests `{text, mapping}` instead of plain text.
    #[must_use]
    pub fn with_mapping(mut self, include_mapping: bool) -> Self {
        self.include_mapping = include_mapping;
        self
    }

    fn selected(&self) -> impl Iterator<Item = PiiType> + '_ {
        [
            PiiType::Names,
            PiiType::Emails,
            PiiType::Phones,
            PiiType::Addresses,
            PiiType::Ssn,
            PiiType::CreditCards,
        ]
        .into_iter()
        .filter(|kind| self.pii_types.contains(kind))
    }
}

call_options!(AnonymizeOptions);

fn schema() -> Result<SchemaSpec> {
    SchemaSpec::builder()
        .field(FieldSpec::new("text", FieldType::String).required())
        .field(FieldSpec::new("mapping", FieldType::Object).required())
        .build()
}

pub(crate) fn build_prompt(text: &str, options: &AnonymizeOptions) -> Result<String> {
    let pii = std::iter::once("Identify and replace the following types of PII:".to_owned())
        .chain(options.selected().map(|kind| format!("- {}", kind.description())))
        .collect::<Vec<_>>()
        .join("\n");

    let style = options.replacement_style;
    let replacements = std::iter::once(format!("Use {} replacement tokens:", style.name()))
        .chain(
            options
                .selected()
                .filter_map(|kind| kind.tokens(style))
                .map(|tokens| format!("- {tokens}")),
        )
        .collect::<Vec<_>>()
        .join("\n");

    let output = if options.include_mapping {
        MAPPED_OUTPUT
    } else {
        PLAIN_OUTPUT
    };

    render(
        PROMPT,
        &["text"],
        &[
            ("text", text),
            ("pii", &pii),
            ("replacements", &replacements),
            ("output", output),
        ],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &AnonymizeOptions,
) -> Result<ParsedResult> {
    validation::validate_text(text, "text")?;
    let prompt = build_prompt(text, options)?;

    if !options.include_mapping {
        let reply = gateway
            .invoke(Operation::Anonymize, prompt, &options.call, None)
            .await?;
        return Ok(ParsedResult::Text(reply.trim().to_owned()));
    }

    let schema = SchemaInput::Spec(schema()?);
    let reply = gateway
        .invoke(Operation::Anonymize, prompt, &options.call, Some(&schema))
        .await?;
    let shape = ResultShape::new("text").with_fallback_field("mapping", json!({}));
    Ok(ParsedResult::Mapping(build(
        &clean_json_response(&reply),
        &shape,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_covers_four_types() {
        let prompt = build_prompt("Call Jane at 555-0100", &AnonymizeOptions::new()).unwrap();
        assert!(prompt.contains("- Names (personal names"));
        assert!(prompt.contains("- Physical addresses"));
        assert!(!prompt.contains("Social Security"));
        assert!(prompt.contains("Use generic replacement tokens:\n- Names: [PERSON]"));
    }

    #[test]
    fn numbered_style_skips_tokens_it_lacks() {
        let options = AnonymizeOptions::new()
            .with_pii_types([PiiType::Ssn, PiiType::Emails])
            .with_replacement_style(ReplacementStyle::Numbered);
        let prompt = build_prompt("SSN 123-45-6789", &options).unwrap();
        assert!(prompt.contains("- Email addresses\n- Social Security Numbers"));
        assert!(prompt.contains("Use numbered replacement tokens:\n- Emails: [EMAIL_1]"));
        assert!(!prompt.contains("[SSN_1]"));
    }

    #[test]
    fn empty_selection_means_defaults() {
        let options = AnonymizeOptions::new().with_pii_types(Vec::new());
        assert_eq!(options.pii_types, PiiType::DEFAULT);
    }

    #[test]
    fn all_expands_to_the_defaults() {
        let options = AnonymizeOptions::new().with_pii_types([PiiType::Ssn, PiiType::All]);
        assert_eq!(
            options.selected().collect::<Vec<_>>(),
            [
                PiiType::Names,
                PiiType::Emails,
                PiiType::Phones,
                PiiType::Addresses,
                PiiType::Ssn,
            ]
        );

        let prompt = build_prompt("Jane, 123-45-6789", &options).unwrap();
        assert!(prompt.contains("- Names (personal names"));
        assert!(prompt.contains("- Social Security Numbers
Use generic"));
        assert!(!prompt.contains("Credit card"));
    }
}
