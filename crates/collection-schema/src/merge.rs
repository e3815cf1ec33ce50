//! Two-source merge with fallback.
//!
//! The JSON-Schema is authoritative for structure and constraints, the
//! declarative source for image and reference annotations. When the JSON-Schema
//! is missing or unusable the annotations alone become a degraded schema.

use tracing::{debug, warn};

use crate::config::Config;
use crate::declarative::{Annotation, DeclarativeExtractor, FieldAnnotation};
use crate::error::{MergeError, PathResolutionFailure, StructuralParseError};
use crate::field::{CompleteSchema, FieldType, SchemaField};
use crate::parse::parse_json_schema;

/// Which branch of the fallback chain produced a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Parsed JSON-Schema, annotated from the declarative source when present.
    Full,
    /// Declarative annotations only: no constraints, no precise types.
    Degraded,
}

/// A recoverable problem met while merging.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    JsonSchemaUnusable(StructuralParseError),
    UnresolvedHelper(PathResolutionFailure),
    UnmatchedAnnotation { path: String, offset: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::JsonSchemaUnusable(err) => write!(f, "JSON-Schema unusable: {err}"),
            Diagnostic::UnresolvedHelper(failure) => write!(f, "{failure}"),
            Diagnostic::UnmatchedAnnotation { path, offset } => write!(
                f,
                "annotation for `{path}` at byte {offset} matches no field"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedSchema {
    pub schema: CompleteSchema,
    pub fidelity: Fidelity,
    pub diagnostics: Vec<Diagnostic>,
}

/// Merge with the default [`Config`].
pub fn merge(
    collection: &str,
    json_schema: Option<&str>,
    declarative: Option<&str>,
) -> Result<MergedSchema, MergeError> {
    SchemaMerger::new(Config::default()).merge(collection, json_schema, declarative)
}

#[derive(Debug, Clone)]
pub struct SchemaMerger {
    config: Config,
    extractor: DeclarativeExtractor,
}

impl Default for SchemaMerger {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SchemaMerger {
    pub fn new(config: Config) -> Self {
        let extractor = DeclarativeExtractor::new(&config);
        Self { config, extractor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the best available schema for `collection`.
    ///
    /// Blank inputs count as absent.
    pub fn merge(
        &self,
        collection: &str,
        json_schema: Option<&str>,
        declarative: Option<&str>,
    ) -> Result<MergedSchema, MergeError> {
        let json_schema = json_schema.filter(|text| !text.trim().is_empty());
        let declarative = declarative.filter(|text| !text.trim().is_empty());
        let mut diagnostics = Vec::new();

        let parsed = json_schema.map(|text| parse_json_schema(text, collection, &self.config));
        let json_schema_error = match parsed {
            Some(Ok(mut schema)) => {
                if let Some(source) = declarative {
                    self.annotate(&mut schema, source, &mut diagnostics);
                }
                debug!(collection, fields = schema.fields.len(), "merged full schema");
                return Ok(MergedSchema {
                    schema,
                    fidelity: Fidelity::Full,
                    diagnostics,
                });
            }
            Some(Err(err)) => {
                warn!(
                    collection,
                    error = %err,
                    "JSON-Schema unusable, falling back to declarative source"
                );
                diagnostics.push(Diagnostic::JsonSchemaUnusable(err.clone()));
                Some(err)
            }
            None => None,
        };

        let Some(source) = declarative else {
            let reason = match &json_schema_error {
                Some(_) => "JSON-Schema is unusable and no declarative source was given",
                None => "neither a JSON-Schema nor a declarative source was given",
            };
            return Err(MergeError::NoSchemaAvailable {
                collection: collection.to_string(),
                reason: reason.to_string(),
                json_schema_error,
            });
        };

        let extraction = self.extractor.extract(collection, source);
        diagnostics.extend(
            extraction
                .failures
                .into_iter()
                .map(Diagnostic::UnresolvedHelper),
        );
        if extraction.annotations.is_empty() {
            return Err(MergeError::NoSchemaAvailable {
                collection: collection.to_string(),
                reason: "declarative source has no resolvable image or reference fields"
                    .to_string(),
                json_schema_error,
            });
        }

        let mut fields: Vec<SchemaField> = Vec::with_capacity(extraction.annotations.len());
        for annotation in &extraction.annotations {
            if fields.iter().any(|f| f.name == annotation.path) {
                debug!(collection, path = %annotation.path, "duplicate annotation ignored");
                continue;
            }
            fields.push(self.degraded_field(annotation));
        }
        warn!(
            collection,
            fields = fields.len(),
            "using degraded schema from declarative source"
        );

        Ok(MergedSchema {
            schema: CompleteSchema::new(collection, fields),
            fidelity: Fidelity::Degraded,
            diagnostics,
        })
    }

    fn annotate(
        &self,
        schema: &mut CompleteSchema,
        source: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let collection = schema.collection.clone();
        let extraction = self.extractor.extract(&collection, source);
        diagnostics.extend(
            extraction
                .failures
                .into_iter()
                .map(Diagnostic::UnresolvedHelper),
        );

        for annotation in extraction.annotations {
            match schema.field_mut(&annotation.path) {
                Some(field) => apply_annotation(field, &annotation),
                None => {
                    warn!(
                        collection = %collection,
                        path = %annotation.path,
                        offset = annotation.offset,
                        "annotation matches no JSON-Schema field, dropped"
                    );
                    diagnostics.push(Diagnostic::UnmatchedAnnotation {
                        path: annotation.path,
                        offset: annotation.offset,
                    });
                }
            }
        }
    }

    fn degraded_field(&self, annotation: &FieldAnnotation) -> SchemaField {
        let annotated_type = match annotation.annotation {
            Annotation::Image => FieldType::Image,
            Annotation::Reference { .. } => FieldType::Reference,
        };
        let field_type = if annotation.array_wrapped {
            FieldType::Array
        } else {
            annotated_type
        };

        let mut field = SchemaField::new(annotation.path.clone(), field_type);
        field.required = self.config.degraded_required;
        apply_annotation(&mut field, annotation);
        field
    }
}

/// Overwrite the field's type information with the annotation.
///
/// Array fields keep `type=array`; the annotation only touches the element type.
fn apply_annotation(field: &mut SchemaField, annotation: &FieldAnnotation) {
    let element = field.field_type == FieldType::Array;
    match (&annotation.annotation, element) {
        (Annotation::Image, true) => field.sub_type = Some(FieldType::Image),
        (Annotation::Image, false) => field.field_type = FieldType::Image,
        (Annotation::Reference { collection }, true) => {
            field.sub_type = Some(FieldType::Reference);
            field.array_reference_collection = Some(collection.clone());
        }
        (Annotation::Reference { collection }, false) => {
            field.field_type = FieldType::Reference;
            field.reference_collection = Some(collection.clone());
        }
    }
    debug!(
        path = %field.name,
        field_type = %field.field_type,
        sub_type = ?field.sub_type,
        "applied annotation"
    );
}
