//! JSON-Schema to field list conversion
//!
//! Turns the generated JSON-Schema of a collection into an ordered, flattened
//! list of [`SchemaField`]s. Nested objects are flattened into dotted paths,
//! `anyOf` unions are resolved into semantic types, and constraints are copied
//! from whichever schema in the resolution chain declares them.
//!
//! The `number`/`integer` split follows the `type` keyword alone: `"integer"`
//! yields [`FieldType::Integer`], `"number"` yields [`FieldType::Number`].

use tracing::debug;

use crate::config::{Config, DescriptionSource};
use crate::error::StructuralParseError;
use crate::field::{CompleteSchema, FieldConstraints, FieldType, SchemaField};
use crate::json_schema::{AdditionalProperties, InstanceType, Items, JsonSchema, SchemaObject};

/// Property key reserved for the editor's `$schema` pointer.
const RESERVED_SCHEMA_KEY: &str = "$schema";

/// Formats that carry over into [`FieldConstraints::format`].
const KNOWN_FORMATS: &[&str] = &["email", "uri", "url", "date-time", "date"];

/// Parse the JSON-Schema text and build the schema of `collection`.
pub fn parse_json_schema(
    text: &str,
    collection: &str,
    config: &Config,
) -> Result<CompleteSchema, StructuralParseError> {
    let document: JsonSchema = serde_json::from_str(text)?;
    let parser = JsonSchemaParser::new(&document, config)?;
    parser.parse_collection(collection)
}

/// Outcome of resolving one property schema.
enum Resolution<'a> {
    /// Plain object with properties; flattened into the parent.
    Nested(&'a SchemaObject, Vec<&'a SchemaObject>),
    Leaf(TypeInfo<'a>),
}

/// Semantic type of a leaf field plus the schemas it was derived from.
struct TypeInfo<'a> {
    field_type: FieldType,
    sub_type: Option<FieldType>,
    enum_values: Vec<String>,
    nullable: bool,
    /// Schemas contributing constraints and metadata, outermost first.
    sources: Vec<&'a SchemaObject>,
}

impl<'a> TypeInfo<'a> {
    fn new(field_type: FieldType, source: &'a SchemaObject) -> Self {
        Self {
            field_type,
            sub_type: None,
            enum_values: Vec::new(),
            nullable: false,
            sources: vec![source],
        }
    }

    fn fallback(source: &'a SchemaObject) -> Self {
        Self::new(FieldType::String, source)
    }

    fn wrapped_by(mut self, outer: &[&'a SchemaObject]) -> Self {
        let mut sources = outer.to_vec();
        sources.append(&mut self.sources);
        self.sources = sources;
        self
    }
}

/// Converter holding the document root for `$ref` resolution.
pub struct JsonSchemaParser<'a> {
    document: &'a JsonSchema,
    root: &'a SchemaObject,
    config: &'a Config,
}

impl<'a> JsonSchemaParser<'a> {
    pub fn new(
        document: &'a JsonSchema,
        config: &'a Config,
    ) -> Result<Self, StructuralParseError> {
        let root = document.as_object().ok_or_else(|| {
            StructuralParseError::MalformedDocument("document root is not an object".to_string())
        })?;
        Ok(Self {
            document,
            root,
            config,
        })
    }

    /// Build the schema for the named definition.
    pub fn parse_collection(
        &self,
        collection: &str,
    ) -> Result<CompleteSchema, StructuralParseError> {
        let definition = self.entry_definition(collection)?;
        let entry = self.entry_shape(collection, definition)?;

        let mut fields = Vec::new();
        let mut visiting = vec![entry];
        self.collect_fields(entry, None, true, &mut visiting, &mut fields)?;
        Ok(CompleteSchema::new(collection, fields))
    }

    fn entry_definition(
        &self,
        collection: &str,
    ) -> Result<&'a SchemaObject, StructuralParseError> {
        if let Some(definition) = self.root.definition(collection) {
            return self.deref_object(definition, collection);
        }

        // A bare object schema without any definitions is its own entry.
        let bare = self.root.definitions.is_none()
            && self.root.defs.is_none()
            && self.root.reference.is_none()
            && self.root.has_properties();
        if bare {
            return Ok(self.root);
        }

        Err(StructuralParseError::DefinitionNotFound {
            name: collection.to_string(),
            available: self.root.definition_names(),
        })
    }

    /// Entries of file-keyed collections are described by `additionalProperties`.
    fn entry_shape(
        &self,
        collection: &str,
        definition: &'a SchemaObject,
    ) -> Result<&'a SchemaObject, StructuralParseError> {
        let entry = match &definition.additional_properties {
            Some(AdditionalProperties::Schema(inner)) if !definition.has_properties() => {
                debug!(collection, "descending into file-keyed entry schema");
                self.deref_object(inner, collection)?
            }
            _ => definition,
        };

        let is_object = entry.has_properties()
            || matches!(entry.single_type(), Some(InstanceType::Object) | None);
        if !is_object || entry.union_variants().is_some() {
            return Err(StructuralParseError::MalformedDocument(format!(
                "entry schema of `{collection}` is not an object"
            )));
        }
        Ok(entry)
    }

    fn deref_object(
        &self,
        schema: &'a JsonSchema,
        context: &str,
    ) -> Result<&'a SchemaObject, StructuralParseError> {
        let (target, _) = self.deref(schema)?;
        target.as_object().ok_or_else(|| {
            StructuralParseError::MalformedDocument(format!("`{context}` is a boolean schema"))
        })
    }

    /// Follow `$ref` pointers. Returns the target and every object passed on the way.
    fn deref(
        &self,
        schema: &'a JsonSchema,
    ) -> Result<(&'a JsonSchema, Vec<&'a SchemaObject>), StructuralParseError> {
        let mut current = schema;
        let mut hops: Vec<&'a str> = Vec::new();
        let mut wrappers = Vec::new();

        while let JsonSchema::Object(obj) = current {
            let Some(pointer) = obj.reference.as_deref() else {
                break;
            };
            if hops.contains(&pointer) {
                return Err(StructuralParseError::CircularReference(pointer.to_string()));
            }
            hops.push(pointer);
            wrappers.push(obj.as_ref());
            current = self.lookup_pointer(pointer)?;
        }
        Ok((current, wrappers))
    }

    fn lookup_pointer(&self, pointer: &str) -> Result<&'a JsonSchema, StructuralParseError> {
        if pointer == "#" {
            return Ok(self.document);
        }
        let unresolved = || StructuralParseError::UnresolvedReference(pointer.to_string());
        let (table, name) = pointer
            .strip_prefix("#/")
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(unresolved)?;
        let name = name.replace("~1", "/").replace("~0", "~");
        let map = match table {
            "definitions" => self.root.definitions.as_ref(),
            "$defs" => self.root.defs.as_ref(),
            _ => None,
        };
        map.and_then(|m| m.get(&name)).ok_or_else(unresolved)
    }

    fn collect_fields(
        &self,
        object: &'a SchemaObject,
        prefix: Option<&str>,
        parent_required: bool,
        visiting: &mut Vec<&'a SchemaObject>,
        out: &mut Vec<SchemaField>,
    ) -> Result<(), StructuralParseError> {
        let Some(properties) = &object.properties else {
            return Ok(());
        };

        for (key, property) in properties {
            if key == RESERVED_SCHEMA_KEY {
                continue;
            }
            let path = match prefix {
                Some(prefix) => format!("{prefix}.{key}"),
                None => key.clone(),
            };
            let listed = parent_required && object.is_required(key);

            match self.resolve_property(property)? {
                Resolution::Nested(nested, wrappers) => {
                    if visiting.iter().any(|v| std::ptr::eq(*v, nested)) {
                        return Err(StructuralParseError::CircularReference(path));
                    }
                    let defaulted = wrappers.iter().any(|w| w.default.is_some())
                        || nested.default.is_some();
                    visiting.push(nested);
                    self.collect_fields(nested, Some(&path), listed && !defaulted, visiting, out)?;
                    visiting.pop();
                }
                Resolution::Leaf(info) => out.push(self.build_field(path, info, listed)),
            }
        }
        Ok(())
    }

    fn build_field(&self, path: String, info: TypeInfo<'a>, listed: bool) -> SchemaField {
        let mut field = SchemaField::new(path, info.field_type);
        field.sub_type = info.sub_type;
        field.enum_values = info.enum_values;
        field.default = info.sources.iter().find_map(|s| s.default.clone());
        field.required = listed && !info.nullable && field.default.is_none();
        field.description = self.description(&info.sources);

        let constraints = constraints_of(&info.sources);
        field.constraints = (!constraints.is_empty()).then_some(constraints);

        debug!(
            field = %field.name,
            field_type = %field.field_type,
            required = field.required,
            "resolved field"
        );
        field
    }

    fn description(&self, sources: &[&'a SchemaObject]) -> Option<String> {
        let plain = sources.iter().find_map(|s| s.description.clone());
        let markdown = sources.iter().find_map(|s| s.markdown_description.clone());
        match self.config.description_source {
            DescriptionSource::Description => plain.or(markdown),
            DescriptionSource::MarkdownDescription => markdown.or(plain),
        }
    }

    fn resolve_property(
        &self,
        schema: &'a JsonSchema,
    ) -> Result<Resolution<'a>, StructuralParseError> {
        let (target, mut wrappers) = self.deref(schema)?;
        let obj = match target {
            JsonSchema::Object(obj) => obj.as_ref(),
            JsonSchema::Boolean(_) => {
                return Ok(Resolution::Leaf(TypeInfo {
                    field_type: FieldType::Unknown,
                    sub_type: None,
                    enum_values: Vec::new(),
                    nullable: false,
                    sources: wrappers,
                }));
            }
        };

        if let Some([inner]) = obj.all_of.as_deref() {
            wrappers.push(obj);
            return Ok(match self.resolve_property(inner)? {
                Resolution::Nested(nested, mut inner_wrappers) => {
                    wrappers.append(&mut inner_wrappers);
                    Resolution::Nested(nested, wrappers)
                }
                Resolution::Leaf(info) => Resolution::Leaf(info.wrapped_by(&wrappers)),
            });
        }

        if obj.single_type() == Some(InstanceType::Object)
            && obj.has_properties()
            && obj.union_variants().is_none()
        {
            return Ok(Resolution::Nested(obj, wrappers));
        }

        Ok(Resolution::Leaf(self.resolve_type(obj)?.wrapped_by(&wrappers)))
    }

    fn resolve_type(&self, obj: &'a SchemaObject) -> Result<TypeInfo<'a>, StructuralParseError> {
        if let Some(variants) = obj.union_variants() {
            return Ok(self.resolve_union(variants)?.wrapped_by(&[obj]));
        }

        let types = obj.types();
        let non_null: Vec<InstanceType> = types
            .iter()
            .copied()
            .filter(|t| *t != InstanceType::Null)
            .collect();
        let nullable = non_null.len() < types.len();

        // `null` among the allowed values is nullability, not a choice.
        let literals = obj
            .const_value
            .as_ref()
            .map(std::slice::from_ref)
            .or(obj.enum_values.as_deref());
        if let Some(values) = literals {
            let mut info = TypeInfo::new(FieldType::Enum, obj);
            info.enum_values = values
                .iter()
                .filter(|v| !v.is_null())
                .map(enum_value_string)
                .collect();
            info.nullable = nullable || values.iter().any(serde_json::Value::is_null);
            return Ok(info);
        }

        let mut info = match non_null.as_slice() {
            [] if nullable => TypeInfo::new(FieldType::Unknown, obj),
            [] if obj.has_properties() => TypeInfo::new(FieldType::Object, obj),
            [] => TypeInfo::new(FieldType::Unknown, obj),
            [InstanceType::Array] => self.resolve_array(obj)?,
            [single] => TypeInfo::new(scalar_type(*single, obj.format.as_deref()), obj),
            _ => {
                debug!(types = ?types, "multi-typed schema falls back to string");
                TypeInfo::fallback(obj)
            }
        };
        info.nullable |= nullable;
        Ok(info)
    }

    fn resolve_array(&self, obj: &'a SchemaObject) -> Result<TypeInfo<'a>, StructuralParseError> {
        let mut info = TypeInfo::new(FieldType::Array, obj);
        info.sub_type = Some(match &obj.items {
            Some(Items::Single(items)) => match self.resolve_property(items)? {
                Resolution::Nested(..) => FieldType::Object,
                Resolution::Leaf(item) => {
                    info.enum_values = item.enum_values;
                    item.field_type
                }
            },
            Some(Items::Tuple(_)) | None => FieldType::Unknown,
        });
        Ok(info)
    }

    /// Union shapes are tested in priority order because the patterns overlap.
    fn resolve_union(
        &self,
        variants: &'a [JsonSchema],
    ) -> Result<TypeInfo<'a>, StructuralParseError> {
        let mut resolved = Vec::with_capacity(variants.len());
        for variant in variants {
            match self.deref(variant)?.0 {
                JsonSchema::Object(obj) => resolved.push(obj.as_ref()),
                JsonSchema::Boolean(_) => return Ok(union_fallback(&[])),
            }
        }

        if is_date_union(&resolved) {
            return Ok(TypeInfo {
                field_type: FieldType::Date,
                sub_type: None,
                enum_values: Vec::new(),
                nullable: false,
                sources: Vec::new(),
            });
        }

        if resolved.iter().any(|v| is_reference_variant(v)) {
            return Ok(TypeInfo {
                field_type: FieldType::Reference,
                sub_type: None,
                enum_values: Vec::new(),
                nullable: false,
                sources: Vec::new(),
            });
        }

        if let [a, b] = resolved.as_slice() {
            let other = match (a.is_null(), b.is_null()) {
                (true, false) => Some(*b),
                (false, true) => Some(*a),
                _ => None,
            };
            if let Some(other) = other {
                let mut info = self.resolve_type(other)?;
                if is_nullable_target(&info) {
                    info.nullable = true;
                    return Ok(info);
                }
            }
        }

        Ok(union_fallback(&resolved))
    }
}

/// Types a `{type: null}` variant may wrap without losing the field.
fn is_nullable_target(info: &TypeInfo<'_>) -> bool {
    !matches!(info.field_type, FieldType::Object | FieldType::Unknown)
}

fn union_fallback<'a>(variants: &[&'a SchemaObject]) -> TypeInfo<'a> {
    debug!(variants = variants.len(), "unrecognized union falls back to string");
    TypeInfo {
        field_type: FieldType::String,
        sub_type: None,
        enum_values: Vec::new(),
        nullable: false,
        sources: Vec::new(),
    }
}

/// `{string, date-time}`, `{string, date}` and `{integer, unix-time}` in any order.
fn is_date_union(variants: &[&SchemaObject]) -> bool {
    const DATE_VARIANTS: [(InstanceType, &str); 3] = [
        (InstanceType::String, "date-time"),
        (InstanceType::String, "date"),
        (InstanceType::Integer, "unix-time"),
    ];
    if variants.len() != DATE_VARIANTS.len() {
        return false;
    }
    let mut seen = [false; 3];
    for variant in variants {
        let position = DATE_VARIANTS.iter().position(|(ty, format)| {
            variant.single_type() == Some(*ty) && variant.format.as_deref() == Some(*format)
        });
        match position {
            Some(i) if !seen[i] => seen[i] = true,
            _ => return false,
        }
    }
    true
}

/// An object variant requiring `collection` plus `id` or `slug`.
fn is_reference_variant(variant: &SchemaObject) -> bool {
    let is_object = variant.single_type() == Some(InstanceType::Object) || variant.has_properties();
    is_object
        && variant.is_required("collection")
        && (variant.is_required("id") || variant.is_required("slug"))
}

fn scalar_type(ty: InstanceType, format: Option<&str>) -> FieldType {
    match ty {
        InstanceType::String => match format {
            Some("email") => FieldType::Email,
            Some("uri") | Some("url") => FieldType::Url,
            Some("date-time") | Some("date") => FieldType::Date,
            _ => FieldType::String,
        },
        InstanceType::Number => FieldType::Number,
        InstanceType::Integer => FieldType::Integer,
        InstanceType::Boolean => FieldType::Boolean,
        InstanceType::Object => FieldType::Object,
        InstanceType::Array => FieldType::Array,
        InstanceType::Null => FieldType::Unknown,
    }
}

fn enum_value_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn constraints_of(sources: &[&SchemaObject]) -> FieldConstraints {
    FieldConstraints {
        min: sources.iter().find_map(|s| s.minimum),
        max: sources.iter().find_map(|s| s.maximum),
        min_length: sources.iter().find_map(|s| s.min_length.or(s.min_items)),
        max_length: sources.iter().find_map(|s| s.max_length.or(s.max_items)),
        pattern: sources.iter().find_map(|s| s.pattern.clone()),
        format: sources
            .iter()
            .filter_map(|s| s.format.as_deref())
            .find(|f| KNOWN_FORMATS.contains(f))
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(definition: serde_json::Value) -> CompleteSchema {
        try_parse(definition).unwrap()
    }

    fn try_parse(definition: serde_json::Value) -> Result<CompleteSchema, StructuralParseError> {
        let document = json!({
            "$ref": "#/definitions/blog",
            "definitions": { "blog": definition },
            "$schema": "http://json-schema.org/draft-07/schema#"
        });
        parse_json_schema(&document.to_string(), "blog", &Config::default())
    }

    fn object(properties: serde_json::Value, required: &[&str]) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }

    #[test]
    fn test_primitive_fields_and_required() {
        let schema = parse(object(
            json!({
                "title": { "type": "string", "minLength": 1, "maxLength": 80 },
                "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "price": { "type": "number" },
                "draft": { "type": "boolean", "default": false }
            }),
            &["title", "rating", "price", "draft"],
        ));

        let title = schema.field("title").unwrap();
        assert_eq!(title.field_type, FieldType::String);
        assert!(title.required);
        let constraints = title.constraints.as_ref().unwrap();
        assert_eq!(constraints.min_length, Some(1));
        assert_eq!(constraints.max_length, Some(80));

        let rating = schema.field("rating").unwrap();
        assert_eq!(rating.field_type, FieldType::Integer);
        assert_eq!(rating.constraints.as_ref().unwrap().min, Some(1.0));
        assert_eq!(rating.constraints.as_ref().unwrap().max, Some(5.0));

        assert_eq!(schema.field("price").unwrap().field_type, FieldType::Number);

        let draft = schema.field("draft").unwrap();
        assert_eq!(draft.field_type, FieldType::Boolean);
        assert!(!draft.required, "default forces optional");
        assert_eq!(draft.default, Some(json!(false)));
    }

    #[test]
    fn test_string_formats_select_type() {
        let schema = parse(object(
            json!({
                "contact": { "type": "string", "format": "email" },
                "homepage": { "type": "string", "format": "uri" },
                "published": { "type": "string", "format": "date" },
                "id": { "type": "string", "format": "uuid" }
            }),
            &[],
        ));
        assert_eq!(schema.field("contact").unwrap().field_type, FieldType::Email);
        let homepage = schema.field("homepage").unwrap();
        assert_eq!(homepage.field_type, FieldType::Url);
        assert_eq!(
            homepage.constraints.as_ref().unwrap().format.as_deref(),
            Some("uri")
        );
        assert_eq!(schema.field("published").unwrap().field_type, FieldType::Date);

        let id = schema.field("id").unwrap();
        assert_eq!(id.field_type, FieldType::String);
        assert_eq!(id.constraints, None);
    }

    #[test]
    fn test_date_union_any_order() {
        let variants = [
            json!({ "type": "string", "format": "date-time" }),
            json!({ "type": "string", "format": "date" }),
            json!({ "type": "integer", "format": "unix-time" }),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let any_of: Vec<_> = order.iter().map(|i| variants[*i].clone()).collect();
            let schema = parse(object(json!({ "pubDate": { "anyOf": any_of } }), &["pubDate"]));
            let field = schema.field("pubDate").unwrap();
            assert_eq!(field.field_type, FieldType::Date, "order {order:?}");
            assert!(field.required);
        }
    }

    #[test]
    fn test_date_union_with_duplicate_variant_is_not_date() {
        let schema = parse(object(
            json!({ "when": { "anyOf": [
                { "type": "string", "format": "date-time" },
                { "type": "string", "format": "date-time" },
                { "type": "integer", "format": "unix-time" }
            ] } }),
            &[],
        ));
        assert_eq!(schema.field("when").unwrap().field_type, FieldType::String);
    }

    #[test]
    fn test_reference_union() {
        let schema = parse(object(
            json!({ "author": { "anyOf": [
                { "type": "string" },
                {
                    "type": "object",
                    "properties": { "id": { "type": "string" }, "collection": { "type": "string" } },
                    "required": ["id", "collection"]
                },
                {
                    "type": "object",
                    "properties": { "slug": { "type": "string" }, "collection": { "type": "string" } },
                    "required": ["slug", "collection"]
                }
            ] } }),
            &["author"],
        ));
        let author = schema.field("author").unwrap();
        assert_eq!(author.field_type, FieldType::Reference);
        assert_eq!(author.reference_collection, None);
        assert!(author.required);
    }

    #[test]
    fn test_nullable_primitive_is_optional() {
        let schema = parse(object(
            json!({ "subtitle": {
                "anyOf": [{ "type": "string", "maxLength": 120 }, { "type": "null" }],
                "description": "Shown under the title"
            } }),
            &["subtitle"],
        ));
        let subtitle = schema.field("subtitle").unwrap();
        assert_eq!(subtitle.field_type, FieldType::String);
        assert!(!subtitle.required);
        assert_eq!(subtitle.description.as_deref(), Some("Shown under the title"));
        assert_eq!(subtitle.constraints.as_ref().unwrap().max_length, Some(120));
    }

    #[test]
    fn test_nullable_enum() {
        let schema = parse(object(
            json!({ "status": { "anyOf": [
                { "type": "null" },
                { "type": "string", "enum": ["draft", "review", "published"] }
            ] } }),
            &["status"],
        ));
        let status = schema.field("status").unwrap();
        assert_eq!(status.field_type, FieldType::Enum);
        assert_eq!(status.enum_values, vec!["draft", "review", "published"]);
        assert!(!status.required);
    }

    #[test]
    fn test_type_array_nullable_enum() {
        let schema = parse(object(
            json!({
                "status": { "type": ["string", "null"], "enum": ["a", "b", null] },
                "stage": { "type": "string", "enum": ["x", "y"] }
            }),
            &["status", "stage"],
        ));
        let status = schema.field("status").unwrap();
        assert_eq!(status.field_type, FieldType::Enum);
        assert_eq!(status.enum_values, vec!["a", "b"]);
        assert!(!status.required);

        let stage = schema.field("stage").unwrap();
        assert_eq!(stage.enum_values, vec!["x", "y"]);
        assert!(stage.required);
    }

    #[test]
    fn test_type_array_nullable() {
        let schema = parse(object(
            json!({ "views": { "type": ["integer", "null"], "minimum": 0 } }),
            &["views"],
        ));
        let views = schema.field("views").unwrap();
        assert_eq!(views.field_type, FieldType::Integer);
        assert!(!views.required);
        assert_eq!(views.constraints.as_ref().unwrap().min, Some(0.0));
    }

    #[test]
    fn test_unrecognized_union_falls_back_to_string() {
        let schema = parse(object(
            json!({
                "mixed": { "anyOf": [{ "type": "string" }, { "type": "number" }] },
                "nullableObject": { "anyOf": [
                    { "type": "object", "properties": { "a": { "type": "string" } } },
                    { "type": "null" }
                ] }
            }),
            &[],
        ));
        assert_eq!(schema.field("mixed").unwrap().field_type, FieldType::String);
        assert_eq!(
            schema.field("nullableObject").unwrap().field_type,
            FieldType::String
        );
    }

    #[test]
    fn test_nested_objects_flatten_in_place() {
        let schema = parse(object(
            json!({
                "title": { "type": "string" },
                "seo": {
                    "type": "object",
                    "properties": {
                        "meta": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "keywords": { "type": "array", "items": { "type": "string" } }
                            },
                            "required": ["title"]
                        },
                        "noindex": { "type": "boolean" }
                    },
                    "required": ["meta", "noindex"]
                },
                "body": { "type": "string" }
            }),
            &["title", "seo"],
        ));

        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(
            names,
            vec!["title", "seo.meta.title", "seo.meta.keywords", "seo.noindex", "body"]
        );

        let meta_title = schema.field("seo.meta.title").unwrap();
        assert!(meta_title.is_nested);
        assert_eq!(meta_title.parent_path.as_deref(), Some("seo.meta"));
        assert!(meta_title.required);
        assert!(!schema.field("seo.meta.keywords").unwrap().required);
        assert!(schema.field("seo.noindex").unwrap().required);
    }

    #[test]
    fn test_optional_parent_makes_children_optional() {
        let schema = parse(object(
            json!({ "cover": {
                "type": "object",
                "properties": { "src": { "type": "string" }, "alt": { "type": "string" } },
                "required": ["src", "alt"]
            } }),
            &[],
        ));
        assert!(!schema.field("cover.src").unwrap().required);
        assert!(!schema.field("cover.alt").unwrap().required);
    }

    #[test]
    fn test_array_fields() {
        let schema = parse(object(
            json!({
                "tags": { "type": "array", "items": { "type": "string" }, "minItems": 1, "maxItems": 5 },
                "categories": { "type": "array", "items": { "type": "string", "enum": ["news", "guides"] } },
                "related": { "type": "array", "items": { "anyOf": [
                    { "type": "string" },
                    { "type": "object", "properties": { "id": {}, "collection": {} }, "required": ["id", "collection"] }
                ] } },
                "links": { "type": "array", "items": {
                    "type": "object", "properties": { "url": { "type": "string" } }
                } }
            }),
            &["tags"],
        ));

        let tags = schema.field("tags").unwrap();
        assert_eq!(tags.field_type, FieldType::Array);
        assert_eq!(tags.sub_type, Some(FieldType::String));
        let constraints = tags.constraints.as_ref().unwrap();
        assert_eq!(constraints.min_length, Some(1));
        assert_eq!(constraints.max_length, Some(5));

        let categories = schema.field("categories").unwrap();
        assert_eq!(categories.sub_type, Some(FieldType::Enum));
        assert_eq!(categories.enum_values, vec!["news", "guides"]);

        assert_eq!(
            schema.field("related").unwrap().sub_type,
            Some(FieldType::Reference)
        );
        assert_eq!(schema.field("links").unwrap().sub_type, Some(FieldType::Object));
        assert!(schema.field("links.url").is_none());
    }

    #[test]
    fn test_const_is_single_value_enum() {
        let schema = parse(object(
            json!({ "kind": { "type": "string", "const": "post" }, "version": { "const": 2 } }),
            &["kind"],
        ));
        let kind = schema.field("kind").unwrap();
        assert_eq!(kind.field_type, FieldType::Enum);
        assert_eq!(kind.enum_values, vec!["post"]);
        assert_eq!(schema.field("version").unwrap().enum_values, vec!["2"]);
    }

    #[test]
    fn test_description_preference() {
        let definition = object(
            json!({ "title": {
                "type": "string",
                "description": "plain",
                "markdownDescription": "**markdown**"
            } }),
            &[],
        );
        let schema = parse(definition.clone());
        assert_eq!(
            schema.field("title").unwrap().description.as_deref(),
            Some("plain")
        );

        let document = json!({ "definitions": { "blog": definition } }).to_string();
        let config = Config {
            description_source: DescriptionSource::MarkdownDescription,
            ..Config::default()
        };
        let schema = parse_json_schema(&document, "blog", &config).unwrap();
        assert_eq!(
            schema.field("title").unwrap().description.as_deref(),
            Some("**markdown**")
        );
    }

    #[test]
    fn test_reserved_schema_key_is_skipped() {
        let schema = parse(object(
            json!({ "$schema": { "type": "string" }, "name": { "type": "string" } }),
            &["name"],
        ));
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_file_keyed_collection() {
        let schema = parse(json!({
            "type": "object",
            "additionalProperties": object(
                json!({ "name": { "type": "string" }, "email": { "type": "string", "format": "email" } }),
                &["name"],
            )
        }));
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["name", "email"]);
        assert!(schema.field("name").unwrap().required);
    }

    #[test]
    fn test_ref_resolution_and_cycles() {
        let document = json!({
            "$ref": "#/definitions/blog",
            "definitions": {
                "blog": {
                    "type": "object",
                    "properties": {
                        "author": { "$ref": "#/definitions/person", "description": "Who wrote it" }
                    },
                    "required": ["author"]
                },
                "person": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                }
            }
        });
        let schema = parse_json_schema(&document.to_string(), "blog", &Config::default()).unwrap();
        let name = schema.field("author.name").unwrap();
        assert!(name.required);

        let cyclic = json!({
            "definitions": {
                "blog": { "$ref": "#/definitions/loop" },
                "loop": { "$ref": "#/definitions/blog" }
            }
        });
        assert!(matches!(
            parse_json_schema(&cyclic.to_string(), "blog", &Config::default()),
            Err(StructuralParseError::CircularReference(_))
        ));

        let recursive = json!({
            "definitions": {
                "blog": {
                    "type": "object",
                    "properties": { "child": { "$ref": "#/definitions/blog" } }
                }
            }
        });
        assert!(matches!(
            parse_json_schema(&recursive.to_string(), "blog", &Config::default()),
            Err(StructuralParseError::CircularReference(path)) if path == "child"
        ));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_json_schema("{ not json", "blog", &Config::default()),
            Err(StructuralParseError::InvalidJson(_))
        ));

        let document = json!({ "definitions": { "docs": { "type": "object" } } }).to_string();
        match parse_json_schema(&document, "blog", &Config::default()) {
            Err(StructuralParseError::DefinitionNotFound { name, available }) => {
                assert_eq!(name, "blog");
                assert_eq!(available, vec!["docs"]);
            }
            other => panic!("Expected DefinitionNotFound, got {other:?}"),
        }

        assert!(matches!(
            try_parse(json!({ "type": "string" })),
            Err(StructuralParseError::MalformedDocument(_))
        ));

        let dangling = json!({ "definitions": { "blog": { "$ref": "#/definitions/nope" } } });
        assert!(matches!(
            parse_json_schema(&dangling.to_string(), "blog", &Config::default()),
            Err(StructuralParseError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_bare_object_document() {
        let document = object(json!({ "title": { "type": "string" } }), &["title"]).to_string();
        let schema = parse_json_schema(&document, "pages", &Config::default()).unwrap();
        assert_eq!(schema.collection, "pages");
        assert!(schema.field("title").unwrap().required);
    }
}
