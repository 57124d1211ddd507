//! Prompt templates with `{{variable}}` substitution.

use std::collections::HashMap;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required variable was not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// A required variable was declared but never referenced.
    #[error("template does not reference required variable: {name}")]
    UnusedRequired {
        /// Name of the unreferenced variable.
        name: String,
    },
}

impl From<TemplateError> for text_primitives::Error {
    fn from(value: TemplateError) -> Self {
        Self::validation(value.to_string())
    }
}

/// A prompt template with variable substitution.
///
/// Placeholders use `{{name}}` syntax. Substitution is a single pass over the
/// template text, so substituted values are never re-scanned for
/// placeholders. Unbound optional variables render as the empty string.
///
/// # Examples
///
/// ```
/// use text_prompts::PromptTemplate;
///
/// let template = PromptTemplate::builder("Translate the following text to {{to}}.\n\n{{text}}")
///     .with_required_variable("text")
///     .build()
///     .unwrap();
///
/// let prompt = template
///     .render_pairs([("text", "Good morning"), ("to", "French")])
///     .unwrap();
/// assert!(prompt.starts_with("Translate the following text to French."));
/// assert!(prompt.ends_with("Good morning"));
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    template: String,
    required_variables: Vec<String>,
}

impl PromptTemplate {
    /// Returns a builder for constructing templates.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(template)
    }

    /// Renders the template with variables given as pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not bound.
    pub fn render_pairs<'a, I>(&self, pairs: I) -> TemplateResult<String>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let vars: HashMap<&str, &str> = pairs.into_iter().collect();
        if let Some(name) = self
            .required_variables
            .iter()
            .find(|name| !vars.contains_key(name.as_str()))
        {
            return Err(TemplateError::MissingVariable { name: name.clone() });
        }

        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find("{{") {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                output.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let name = after_open[..close].trim();
            output.push_str(vars.get(name).copied().unwrap_or_default());
            rest = &after_open[close + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Builder for constructing prompt templates.
pub struct TemplateBuilder {
    template: String,
    required_variables: Vec<String>,
}

impl TemplateBuilder {
    /// Creates a new builder with the supplied template text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            required_variables: Vec::new(),
        }
    }

    /// Declares a required variable (must be bound at render time).
    #[must_use]
    pub fn with_required_variable(mut self, name: impl Into<String>) -> Self {
        self.required_variables.push(name.into());
        self
    }

    /// Builds the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnusedRequired`] if a required variable never
    /// appears in the template text.
    pub fn build(self) -> TemplateResult<PromptTemplate> {
        let referenced = extract_variable_refs(&self.template);
        if let Some(name) = self
            .required_variables
            .iter()
            .find(|name| !referenced.contains(name))
        {
            return Err(TemplateError::UnusedRequired { name: name.clone() });
        }

        Ok(PromptTemplate {
            template: self.template,
            required_variables: self.required_variables,
        })
    }
}

/// Extracts variable names from a template string.
fn extract_variable_refs(template: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        let name = after_open[..close].trim();
        if !name.is_empty() {
            vars.push(name.to_owned());
        }
        rest = &after_open[close + 2..];
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str, required: &[&str]) -> PromptTemplate {
        required
            .iter()
            .fold(PromptTemplate::builder(text), |builder, name| {
                builder.with_required_variable(*name)
            })
            .build()
            .unwrap()
    }

    #[test]
    fn renders_simple_template() {
        let rendered = template("Hello {{name}}!", &["name"])
            .render_pairs([("name", "World")])
            .unwrap();
        assert_eq!(rendered, "Hello World!");
    }

    #[test]
    fn later_pairs_win() {
        let rendered = template("Length: {{length}}", &[])
            .render_pairs([("length", "3-5 sentences"), ("length", "1-2 sentences")])
            .unwrap();
        assert_eq!(rendered, "Length: 1-2 sentences");
    }

    #[test]
    fn required_variables_error_when_missing() {
        let err = template("Text:\n{{text}}", &["text"])
            .render_pairs([("other", "x")])
            .expect_err("should error");
        assert!(matches!(err, TemplateError::MissingVariable { ref name } if name == "text"));

        let converted: text_primitives::Error = err.into();
        assert!(converted.is_validation());
    }

    #[test]
    fn required_variable_must_be_referenced() {
        let err = PromptTemplate::builder("no placeholders")
            .with_required_variable("text")
            .build()
            .expect_err("unused");
        assert!(matches!(err, TemplateError::UnusedRequired { .. }));
    }

    #[test]
    fn optional_variables_render_empty() {
        let rendered = template("Summarize{{limit}}.", &[]).render_pairs(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(rendered, "Summarize.");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let rendered = template("Q: {{question}}\nText: {{text}}", &["text"])
            .render_pairs([("question", "what is {{text}}?"), ("text", "body")])
            .unwrap();
        assert_eq!(rendered, "Q: what is {{text}}?\nText: body");
    }

    #[test]
    fn json_braces_survive_rendering() {
        let rendered = template("Example:\n{\n  \"text\": \"[PERSON_1]\"\n}\n{{text}}", &["text"])
            .render_pairs([("text", "hi")])
            .unwrap();
        assert!(rendered.contains("{\n  \"text\": \"[PERSON_1]\"\n}"));
        assert!(rendered.ends_with("hi"));
    }

    #[test]
    fn unterminated_placeholder_is_kept_verbatim() {
        let rendered = template("{{text}} and {{oops", &["text"])
            .render_pairs([("text", "body")])
            .unwrap();
        assert_eq!(rendered, "body and {{oops");
    }

    #[test]
    fn extracts_variable_refs() {
        let vars = extract_variable_refs("Hello {{ name }}, you are {{age}}. {{greeting}}");
        assert_eq!(vars, vec!["name", "age", "greeting"]);
    }
}
