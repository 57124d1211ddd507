//! Single-label classification.

use text_primitives::{Operation, Result, validation};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Classify the following text into one of these categories:
{{categories}}

Return only the category name, nothing else.

Text:
{{text}}
";

/// Options for [`TextClient::classify`](crate::TextClient::classify).
#[derive(Clone, Debug)]
pub struct ClassifyOptions {
    categories: Vec<String>,
    call: CallOptions,
}

impl ClassifyOptions {
    /// Classifies into one of `categories`.
    #[must_use]
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            call: CallOptions::default(),
        }
    }

    /// Candidate categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

call_options!(ClassifyOptions);

pub(crate) fn build_prompt(text: &str, options: &ClassifyOptions) -> Result<String> {
    let categories = options
        .categories
        .iter()
        .map(|category| format!("- {category}"))
        .collect::<Vec<_>>()
        .join("\n");
    render(
        PROMPT,
        &["text", "categories"],
        &[("text", text), ("categories", &categories)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &ClassifyOptions,
) -> Result<String> {
    validation::validate_text(text, "text")?;
    validation::validate_list(&options.categories, "categories", 1)?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::Classify, prompt, &options.call, None)
        .await?;
    Ok(reply.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_categories() {
        let options = ClassifyOptions::new(["positive", "negative"]);
        let prompt = build_prompt("Great!", &options).unwrap();
        assert!(prompt.contains("categories:\n- positive\n- negative\n\n"));
    }
}
