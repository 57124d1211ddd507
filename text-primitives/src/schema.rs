//! Canonical schema representation and normalization.
//!
//! Callers describe the shape they expect back from a model in one of three
//! ways: a ready [`SchemaSpec`] (or anything implementing [`SchemaSource`]), a
//! JSON-Schema-style object with a `properties` mapping, or a flat
//! `field -> type` mapping. [`normalize`] folds all of them into a
//! [`SchemaSpec`].
//!
//! Normalization is best effort. Property types that cannot be mapped onto a
//! supported primitive become `string` under [`SchemaStrictness::Lenient`]
//! and are rejected under [`SchemaStrictness::Strict`]. `oneOf` unions always
//! degrade to `string`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// Primitive element type of an array field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ItemType {
    /// JSON string.
    String,
    /// JSON number (integers included).
    Number,
    /// JSON boolean.
    Boolean,
}

impl ItemType {
    const fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Type of a single schema field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON number (integers included).
    Number,
    /// JSON boolean.
    Boolean,
    /// Array of primitives.
    Array(ItemType),
    /// Free-form mapping of string keys to string values.
    Object,
}

impl FieldType {
    fn to_json_schema(self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Number => json!({ "type": "number" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Array(item) => json!({ "type": "array", "items": { "type": item.json_type() } }),
            Self::Object => json!({ "type": "object", "additionalProperties": { "type": "string" } }),
        }
    }
}

/// How [`normalize`] treats property types it does not recognise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaStrictness {
    /// Unrecognised types silently become `string`.
    #[default]
    Lenient,
    /// Unrecognised types are rejected with [`Error::Schema`].
    Strict,
}

/// Describes one field of a [`SchemaSpec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    required: bool,
    allowed: Option<Vec<String>>,
    description: Option<String>,
}

impl FieldSpec {
    /// Creates an optional field of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            allowed: None,
            description: None,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restricts the field to the supplied string values.
    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches a description forwarded to the model.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether the model must always populate the field.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Allowed values, if the field is an enumeration.
    #[must_use]
    pub fn allowed_values(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn to_json_schema(&self) -> Value {
        let mut property = self.field_type.to_json_schema();
        if let Value::Object(map) = &mut property {
            if let Some(values) = &self.allowed {
                map.insert("enum".into(), Value::from(values.clone()));
            }
            if let Some(description) = &self.description {
                map.insert("description".into(), Value::from(description.clone()));
            }
        }
        property
    }
}

/// Canonical, ordered, non-empty schema description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaSpec {
    fields: Vec<FieldSpec>,
}

impl SchemaSpec {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaSpecBuilder {
        SchemaSpecBuilder::default()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }

    /// Names of fields declared as `boolean`.
    pub fn boolean_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| field.field_type == FieldType::Boolean)
            .map(FieldSpec::name)
    }

    /// Renders the schema as a JSON Schema object for model providers.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.to_json_schema()))
            .collect();
        let required: Vec<Value> = self
            .fields
            .iter()
            .filter(|field| field.required)
            .map(|field| Value::from(field.name.clone()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Builder for [`SchemaSpec`].
#[derive(Debug, Default)]
pub struct SchemaSpecBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaSpecBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Finalises the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if no fields were added, a field name is
    /// blank, or a name appears twice.
    pub fn build(self) -> Result<SchemaSpec> {
        if self.fields.is_empty() {
            return Err(Error::schema("schema must declare at least one field"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(Error::schema("field names cannot be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::schema(format!("duplicate field `{}`", field.name)));
            }
        }

        Ok(SchemaSpec {
            fields: self.fields,
        })
    }
}

/// Anything that can produce a canonical schema on demand.
pub trait SchemaSource: Send + Sync {
    /// Returns the canonical schema.
    fn schema_spec(&self) -> SchemaSpec;
}

impl SchemaSource for SchemaSpec {
    fn schema_spec(&self) -> SchemaSpec {
        self.clone()
    }
}

/// The schema shapes accepted at the public boundary.
#[derive(Clone)]
pub enum SchemaInput {
    /// Already canonical.
    Spec(SchemaSpec),
    /// A value exposing a schema-producing capability.
    Source(Arc<dyn SchemaSource>),
    /// JSON-Schema-style object or flat `field -> type` mapping.
    Json(Value),
}

impl SchemaInput {
    /// Builds a flat `field -> type` mapping input.
    ///
    /// ```
    /// use text_primitives::{FieldType, SchemaInput, SchemaStrictness, normalize};
    ///
    /// let input = SchemaInput::fields([("name", "string"), ("age", "integer")]);
    /// let spec = normalize(&input, SchemaStrictness::Lenient).unwrap();
    /// assert_eq!(spec.field("age").unwrap().field_type(), FieldType::Number);
    /// ```
    #[must_use]
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, Value> = fields
            .into_iter()
            .map(|(name, kind)| (name.into(), Value::String(kind.into())))
            .collect();
        Self::Json(Value::Object(map))
    }

    /// Wraps a schema-producing capability.
    #[must_use]
    pub fn source(source: impl SchemaSource + 'static) -> Self {
        Self::Source(Arc::new(source))
    }
}

impl fmt::Debug for SchemaInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
            Self::Source(_) => f.write_str("Source(..)"),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

impl From<SchemaSpec> for SchemaInput {
    fn from(value: SchemaSpec) -> Self {
        Self::Spec(value)
    }
}

impl From<Value> for SchemaInput {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Folds any accepted schema shape into a [`SchemaSpec`].
///
/// # Errors
///
/// Returns [`Error::Schema`] when the input is not a mapping, yields no
/// fields, or (under [`SchemaStrictness::Strict`]) declares a type that has
/// no canonical equivalent.
pub fn normalize(input: &SchemaInput, strictness: SchemaStrictness) -> Result<SchemaSpec> {
    match input {
        SchemaInput::Spec(spec) => Ok(spec.clone()),
        SchemaInput::Source(source) => Ok(source.schema_spec()),
        SchemaInput::Json(Value::Object(map)) => match map.get("properties") {
            Some(Value::Object(properties)) => {
                normalize_json_schema(properties, map.get("required"), strictness)
            }
            _ => normalize_flat(map, strictness),
        },
        SchemaInput::Json(other) => Err(Error::schema(format!(
            "schema must be a mapping, got {}",
            json_kind(other)
        ))),
    }
}

fn normalize_json_schema(
    properties: &Map<String, Value>,
    required: Option<&Value>,
    strictness: SchemaStrictness,
) -> Result<SchemaSpec> {
    let required: HashSet<&str> = required
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut builder = SchemaSpec::builder();
    for (name, property) in properties {
        let mut field = property_field(name, property, strictness)?;
        if required.contains(name.as_str()) {
            field = field.required();
        }
        builder = builder.field(field);
    }
    builder.build()
}

fn normalize_flat(map: &Map<String, Value>, strictness: SchemaStrictness) -> Result<SchemaSpec> {
    let mut builder = SchemaSpec::builder();
    for (name, declared) in map {
        let field = match declared {
            Value::String(symbol) => {
                let field_type = match symbol_type(symbol) {
                    Some(field_type) => field_type,
                    None => unrecognized(name, symbol, strictness)?,
                };
                FieldSpec::new(name.clone(), field_type)
            }
            Value::Object(_) => property_field(name, declared, strictness)?,
            other => {
                let field_type = unrecognized(name, json_kind(other), strictness)?;
                FieldSpec::new(name.clone(), field_type)
            }
        };
        builder = builder.field(field.required());
    }
    builder.build()
}

fn property_field(name: &str, property: &Value, strictness: SchemaStrictness) -> Result<FieldSpec> {
    let Some(definition) = property.as_object() else {
        let field_type = unrecognized(name, json_kind(property), strictness)?;
        return Ok(FieldSpec::new(name, field_type));
    };

    let field_type = if definition.contains_key("oneOf") {
        FieldType::String
    } else {
        match declared_type(definition) {
            Some(kind) if kind.eq_ignore_ascii_case("array") => {
                FieldType::Array(array_items(name, definition, strictness)?)
            }
            Some(kind) => match symbol_type(kind) {
                Some(FieldType::Array(_)) | None => unrecognized(name, kind, strictness)?,
                Some(field_type) => field_type,
            },
            None => unrecognized(name, "<missing>", strictness)?,
        }
    };

    let mut field = FieldSpec::new(name, field_type);
    if let Some(values) = definition.get("enum").and_then(Value::as_array) {
        field = field.with_enum(values.iter().filter_map(Value::as_str));
    }
    if let Some(description) = definition.get("description").and_then(Value::as_str) {
        field = field.with_description(description);
    }
    Ok(field)
}

fn array_items(
    name: &str,
    definition: &Map<String, Value>,
    strictness: SchemaStrictness,
) -> Result<ItemType> {
    let Some(items) = definition.get("items").and_then(Value::as_object) else {
        return Ok(ItemType::String);
    };
    match declared_type(items) {
        None => Ok(ItemType::String),
        Some(kind) => match symbol_type(kind) {
            Some(FieldType::String) => Ok(ItemType::String),
            Some(FieldType::Number) => Ok(ItemType::Number),
            Some(FieldType::Boolean) => Ok(ItemType::Boolean),
            _ if strictness == SchemaStrictness::Strict => Err(Error::schema(format!(
                "field `{name}` has unsupported array item type `{kind}`"
            ))),
            _ => Ok(ItemType::String),
        },
    }
}

// `type` may be a string or a list such as `["string", "null"]`.
fn declared_type(definition: &Map<String, Value>) -> Option<&str> {
    match definition.get("type")? {
        Value::String(kind) => Some(kind.as_str()),
        Value::Array(kinds) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null"),
        _ => None,
    }
}

fn symbol_type(symbol: &str) -> Option<FieldType> {
    match symbol.trim().trim_start_matches(':').to_ascii_lowercase().as_str() {
        "string" => Some(FieldType::String),
        "integer" | "number" => Some(FieldType::Number),
        "boolean" => Some(FieldType::Boolean),
        "array" => Some(FieldType::Array(ItemType::String)),
        "object" => Some(FieldType::Object),
        _ => None,
    }
}

fn unrecognized(name: &str, kind: &str, strictness: SchemaStrictness) -> Result<FieldType> {
    match strictness {
        SchemaStrictness::Lenient => Ok(FieldType::String),
        SchemaStrictness::Strict => Err(Error::schema(format!(
            "field `{name}` has unsupported type `{kind}`"
        ))),
    }
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
