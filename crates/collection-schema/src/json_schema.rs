//! JSON-Schema representation as Rust ADT
//!
//! Generated collection schemas carry editor-specific keys (`markdownDescription`,
//! `$schema` properties, tuple `items`) next to the Draft-07 vocabulary, so the
//! model is lenient: unknown keys are ignored and every keyword is optional.
//! All keyed maps are [`IndexMap`]s because declaration order is the field
//! order of the rendered form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON-Schema root type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonSchema {
    /// Boolean schema (true = allow all, false = deny all)
    Boolean(bool),

    /// Object schema with any combination of keywords
    Object(Box<SchemaObject>),
}

impl JsonSchema {
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            JsonSchema::Object(obj) => Some(obj),
            JsonSchema::Boolean(_) => None,
        }
    }
}

/// Primitive instance types of the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array,
    Object,
}

/// `type` is either a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(InstanceType),
    Many(Vec<InstanceType>),
}

impl TypeKeyword {
    pub fn types(&self) -> &[InstanceType] {
        match self {
            TypeKeyword::Single(t) => std::slice::from_ref(t),
            TypeKeyword::Many(ts) => ts,
        }
    }
}

/// `items` is a schema for every element, or a tuple of positional schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Single(Box<JsonSchema>),
    Tuple(Vec<JsonSchema>),
}

/// Additional properties policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<JsonSchema>),
}

/// Keywords of a single schema object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<TypeKeyword>,

    // Object keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    // Array keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    // Composition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<JsonSchema>>,

    // Value sets
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(
        rename = "const",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<serde_json::Value>,

    // Numeric and string constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // Metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    // Document-level keys
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, JsonSchema>>,
    #[serde(rename = "$defs", skip_serializing_if = "Option::is_none")]
    pub defs: Option<IndexMap<String, JsonSchema>>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of collapsing it to `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl SchemaObject {
    pub fn types(&self) -> &[InstanceType] {
        self.instance_type.as_ref().map_or(&[], TypeKeyword::types)
    }

    /// The single declared type, if exactly one is declared.
    pub fn single_type(&self) -> Option<InstanceType> {
        match self.types() {
            [t] => Some(*t),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.single_type() == Some(InstanceType::Null)
    }

    /// `anyOf` or `oneOf` variants; generated schemas use them interchangeably.
    pub fn union_variants(&self) -> Option<&[JsonSchema]> {
        self.any_of.as_deref().or(self.one_of.as_deref())
    }

    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    /// Named definition from `definitions`, then `$defs`.
    pub fn definition(&self, name: &str) -> Option<&JsonSchema> {
        self.definitions
            .as_ref()
            .and_then(|d| d.get(name))
            .or_else(|| self.defs.as_ref().and_then(|d| d.get(name)))
    }

    pub fn definition_names(&self) -> Vec<String> {
        self.definitions
            .iter()
            .chain(self.defs.iter())
            .flat_map(|d| d.keys().cloned())
            .collect()
    }
}
