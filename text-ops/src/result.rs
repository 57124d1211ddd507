//! Turns cleaned model output into typed results.

use serde_json::{Map, Value};
use text_primitives::SchemaSpec;
use tracing::warn;

/// Fields that always hold a float score after post-processing.
pub const FLOAT_FIELDS: [&str; 2] = ["confidence", "similarity"];

/// Value returned by operations that may answer in more than one shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedResult {
    /// Plain text answer.
    Text(String),
    /// Yes/no answer.
    Boolean(bool),
    /// Structured answer.
    Mapping(Map<String, Value>),
}

impl ParsedResult {
    /// Returns the text, if this is a text result.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean result.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a structured result.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the result, keeping only a mapping.
    #[must_use]
    pub fn into_mapping(self) -> Option<Map<String, Value>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a field of a structured result.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(field))
    }
}

/// Describes the object an operation expects and what to return when the
/// model does not produce one.
#[derive(Clone, Debug, Default)]
pub struct ResultShape {
    text_field: Option<String>,
    fallback_fields: Vec<(String, Value)>,
    boolean_fields: Vec<String>,
}

impl ResultShape {
    /// Shape whose fallback stores the cleaned text under `field`.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            text_field: Some(field.into()),
            ..Self::default()
        }
    }

    /// Shape whose fallback does not include the cleaned text.
    #[must_use]
    pub fn without_text() -> Self {
        Self::default()
    }

    /// Adds an auxiliary field to the fallback value.
    #[must_use]
    pub fn with_fallback_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fallback_fields.push((name.into(), value));
        self
    }

    /// Registers a field whose `true`/`false`/`yes`/`no` strings become booleans.
    #[must_use]
    pub fn with_boolean_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.boolean_fields.contains(&name) {
            self.boolean_fields.push(name);
        }
        self
    }

    /// Registers every boolean field declared by `schema`.
    #[must_use]
    pub fn with_schema_booleans(self, schema: &SchemaSpec) -> Self {
        schema
            .boolean_fields()
            .fold(self, |shape, name| shape.with_boolean_field(name))
    }

    /// Value returned when the response is not a JSON object.
    ///
    /// Registered boolean fields are normalized here as well, so a bare
    /// `Yes` stored under a boolean text field becomes `true`.
    #[must_use]
    pub fn fallback(&self, cleaned: &str) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(field) = &self.text_field {
            map.insert(field.clone(), Value::String(cleaned.to_owned()));
        }
        for (name, value) in &self.fallback_fields {
            map.insert(name.clone(), value.clone());
        }
        self.coerce_booleans(&mut map);
        map
    }

    fn coerce_booleans(&self, map: &mut Map<String, Value>) {
        for field in &self.boolean_fields {
            if let Some(value) = map.get_mut(field) {
                coerce_boolean(value);
            }
        }
    }
}

/// Parses cleaned output into a mapping, falling back per `shape`.
///
/// Never fails: malformed JSON and non-object JSON both yield
/// [`ResultShape::fallback`].
#[must_use]
pub fn build(cleaned: &str, shape: &ResultShape) -> Map<String, Value> {
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(mut map)) => {
            post_process(&mut map, shape);
            map
        }
        Ok(other) => {
            warn!(
                kind = json_kind(&other),
                "model returned JSON that is not an object; using fallback"
            );
            shape.fallback(cleaned)
        }
        Err(err) => {
            warn!(error = %err, response_len = cleaned.len(), "model response is not valid JSON; using fallback");
            shape.fallback(cleaned)
        }
    }
}

fn post_process(map: &mut Map<String, Value>, shape: &ResultShape) {
    for field in FLOAT_FIELDS {
        if let Some(value) = map.get_mut(field) {
            coerce_float(value);
        }
    }
    shape.coerce_booleans(map);
}

fn coerce_float(value: &mut Value) {
    let coerced = match value {
        Value::Null => return,
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    };
    *value = Value::from(coerced);
}

fn coerce_boolean(value: &mut Value) {
    if let Some(parsed) = value.as_str().and_then(parse_boolean) {
        *value = Value::Bool(parsed);
    }
}

/// Interprets `true`/`yes` and `false`/`no`, ignoring case and whitespace.
///
/// ```
/// use text_ops::result::parse_boolean;
///
/// assert_eq!(parse_boolean(" Yes "), Some(true));
/// assert_eq!(parse_boolean("FALSE"), Some(false));
/// assert_eq!(parse_boolean("maybe"), None);
/// ```
#[must_use]
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Heuristic for questions expecting a yes/no answer.
#[must_use]
pub fn is_boolean_question(question: &str) -> bool {
    const OPENERS: [&str; 15] = [
        "is ", "are ", "was ", "were ", "do ", "does ", "did ", "can ", "could ", "will ",
        "would ", "should ", "has ", "have ", "had ",
    ];

    let question = question.trim().to_lowercase();
    OPENERS.iter().any(|opener| question.starts_with(opener))
        || question.contains(" or not")
        || (question.ends_with('?') && (question.contains("yes") || question.contains("no")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use text_primitives::{FieldSpec, FieldType};

    fn anonymize_shape() -> ResultShape {
        ResultShape::new("text").with_fallback_field("mapping", json!({}))
    }

    #[test]
    fn invalid_json_uses_fallback() {
        let map = build("not json at all", &anonymize_shape());
        assert_eq!(
            Value::Object(map),
            json!({"text": "not json at all", "mapping": {}})
        );
    }

    #[test]
    fn non_object_json_uses_fallback() {
        let map = build("[1, 2, 3]", &anonymize_shape());
        assert_eq!(map["text"], "[1, 2, 3]");
    }

    #[test]
    fn fallback_without_text_field() {
        let shape = ResultShape::without_text()
            .with_fallback_field("similarity", Value::Null)
            .with_fallback_field("error", json!("Failed to parse comparison result"));
        let map = build("garbage", &shape);
        assert_eq!(map.len(), 2);
        assert!(map["similarity"].is_null());
        assert_eq!(map.keys().next().map(String::as_str), Some("similarity"));
    }

    #[test]
    fn scores_become_floats() {
        let map = build(
            r#"{"confidence": 1, "similarity": "0.25"}"#,
            &ResultShape::new("label"),
        );
        assert!(map["confidence"].is_f64());
        assert_eq!(map["confidence"], json!(1.0));
        assert_eq!(map["similarity"], json!(0.25));
    }

    #[test]
    fn unparsable_score_becomes_zero_and_null_is_kept() {
        let map = build(
            r#"{"confidence": "high", "similarity": null}"#,
            &ResultShape::new("label"),
        );
        assert_eq!(map["confidence"], json!(0.0));
        assert!(map["similarity"].is_null());
    }

    #[test]
    fn registered_booleans_are_normalized() {
        let shape = ResultShape::new("answer")
            .with_boolean_field("answer")
            .with_boolean_field("flag")
            .with_boolean_field("other");
        let map = build(
            r#"{"answer": " YES ", "flag": "False", "other": "maybe", "free": "yes"}"#,
            &shape,
        );
        assert_eq!(map["answer"], json!(true));
        assert_eq!(map["flag"], json!(false));
        assert_eq!(map["other"], json!("maybe"));
        assert_eq!(map["free"], json!("yes"));
    }

    #[test]
    fn fallback_normalizes_registered_booleans() {
        let shape = ResultShape::new("answer")
            .with_fallback_field("confidence", Value::Null)
            .with_boolean_field("answer");
        assert_eq!(
            Value::Object(build("Yes", &shape)),
            json!({"answer": true, "confidence": null})
        );
        assert_eq!(build("Paris", &shape)["answer"], json!("Paris"));

        let unregistered = ResultShape::new("text");
        assert_eq!(build("no", &unregistered)["text"], json!("no"));
    }

    #[test]
    fn schema_booleans_are_registered() {
        let schema = SchemaSpec::builder()
            .field(FieldSpec::new("name", FieldType::String).required())
            .field(FieldSpec::new("active", FieldType::Boolean).required())
            .build()
            .unwrap();
        let shape = ResultShape::new("text").with_schema_booleans(&schema);
        let map = build(r#"{"name": "yes", "active": "no"}"#, &shape);
        assert_eq!(map["name"], json!("yes"));
        assert_eq!(map["active"], json!(false));
    }

    #[test]
    fn parses_boolean_words() {
        for word in ["true", "TRUE", " yes", "Yes\n"] {
            assert_eq!(parse_boolean(word), Some(true), "{word:?}");
        }
        for word in ["false", "No", " NO "] {
            assert_eq!(parse_boolean(word), Some(false), "{word:?}");
        }
        assert_eq!(parse_boolean("nope"), None);
    }

    #[test]
    fn detects_boolean_questions() {
        assert!(is_boolean_question("Is the sky blue?"));
        assert!(is_boolean_question("  HAS it shipped"));
        assert!(is_boolean_question("Whether it works or not"));
        assert!(is_boolean_question("Answer yes?"));
        assert!(!is_boolean_question("What is the capital of France?"));
        assert!(!is_boolean_question("Island names?"));
    }

    #[test]
    fn parsed_result_accessors() {
        let text = ParsedResult::Text("hi".to_owned());
        assert_eq!(text.as_text(), Some("hi"));
        assert_eq!(text.as_bool(), None);

        let mapping = ParsedResult::Mapping(build(r#"{"label": "x"}"#, &ResultShape::new("label")));
        assert_eq!(mapping.get("label"), Some(&json!("x")));
        assert!(mapping.into_mapping().is_some());
    }
}
