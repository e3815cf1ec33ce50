//! Canonical field model shared by the parser, the extractor and the merger.
//!
//! A [`CompleteSchema`] is an ordered list of [`SchemaField`]s. The order is the
//! declaration order of the generated JSON-Schema and is rendered as-is by the
//! form UI, so it is stored in a `Vec` and never in a keyed map.

use serde::{Deserialize, Serialize};

use crate::label::label_for_path;

/// Semantic type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Email,
    Url,
    Image,
    Array,
    Enum,
    Reference,
    Object,
    Unknown,
}

impl FieldType {
    /// Name used on the wire and in log messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Image => "image",
            FieldType::Array => "array",
            FieldType::Enum => "enum",
            FieldType::Reference => "reference",
            FieldType::Object => "object",
            FieldType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value constraints carried over from the JSON-Schema.
///
/// For arrays, `minItems`/`maxItems` land in `min_length`/`max_length`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        self == &FieldConstraints::default()
    }
}

/// One entry of the merged schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    /// Dotted path, unique within a schema.
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Element type when `field_type` is [`FieldType::Array`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<FieldType>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FieldConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_reference_collection: Option<String>,
    #[serde(default)]
    pub is_nested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
}

impl SchemaField {
    /// A bare field of the given type with its label derived from `name`.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let parent_path = name.rsplit_once('.').map(|(parent, _)| parent.to_string());
        Self {
            label: label_for_path(&name),
            name,
            field_type,
            sub_type: None,
            required: false,
            constraints: None,
            description: None,
            default: None,
            enum_values: Vec::new(),
            reference_collection: None,
            array_reference_collection: None,
            is_nested: parent_path.is_some(),
            parent_path,
        }
    }

    /// Last segment of the dotted path.
    pub fn leaf_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// The schema of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSchema {
    pub collection: String,
    pub fields: Vec<SchemaField>,
}

impl CompleteSchema {
    pub fn new(collection: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            collection: collection.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut SchemaField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
