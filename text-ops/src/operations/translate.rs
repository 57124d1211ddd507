//! Translation into a target language.

use text_primitives::{Operation, Result, validation};

use super::render;
use crate::gateway::{CallOptions, ModelGateway, call_options};

const PROMPT: &str = "Translate the following text {{source}}to {{target}}.
Return only the translated text, with no explanation or notes.

Text:
{{text}}
";

/// Options for [`TextClient::translate`](crate::TextClient::translate).
#[derive(Clone, Debug)]
pub struct TranslateOptions {
    to: String,
    from: Option<String>,
    call: CallOptions,
}

impl TranslateOptions {
    /// Translates into the language `to`.
    #[must_use]
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            call: CallOptions::default(),
        }
    }

    /// Declares the source language instead of letting the model infer it.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

call_options!(TranslateOptions);

pub(crate) fn build_prompt(text: &str, options: &TranslateOptions) -> Result<String> {
    let source = options
        .from
        .as_deref()
        .map(|from| format!("from {from} "))
        .unwrap_or_default();
    render(
        PROMPT,
        &["text", "target"],
        &[("text", text), ("target", &options.to), ("source", &source)],
    )
}

pub(crate) async fn run(
    gateway: &ModelGateway,
    text: &str,
    options: &TranslateOptions,
) -> Result<String> {
    validation::validate_text(text, "text")?;
    validation::validate_text(&options.to, "to")?;
    let prompt = build_prompt(text, options)?;
    let reply = gateway
        .invoke(Operation::Translate, prompt, &options.call, None)
        .await?;
    Ok(reply.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_languages() {
        let prompt = build_prompt("Bonjour", &TranslateOptions::new("English").with_from("French"))
            .unwrap();
        assert!(prompt.starts_with("Translate the following text from French to English."));

        let prompt = build_prompt("Hola", &TranslateOptions::new("German")).unwrap();
        assert!(prompt.starts_with("Translate the following text to German."));
    }
}
