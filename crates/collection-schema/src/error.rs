//! Error types for schema acquisition.

use thiserror::Error;

use crate::declarative::HelperKind;

/// The generated JSON-Schema could not be turned into a field list.
///
/// Always recoverable: the merger falls back to the declarative source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Definition `{name}` not found (available: {})", available.join(", "))]
    DefinitionNotFound { name: String, available: Vec<String> },

    #[error("Malformed JSON-Schema document: {0}")]
    MalformedDocument(String),

    #[error("Unresolved $ref: {0}")]
    UnresolvedReference(String),

    #[error("Circular reference detected: {0}")]
    CircularReference(String),
}

impl From<serde_json::Error> for StructuralParseError {
    fn from(err: serde_json::Error) -> Self {
        StructuralParseError::InvalidJson(err.to_string())
    }
}

/// Why a helper occurrence could not be traced to a field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveFailureReason {
    #[error("no enclosing field name")]
    NoEnclosingField,

    #[error("helper is nested inside an array of objects under `{field}`")]
    ArrayOfObjects { field: String },

    #[error("unsupported expression `{expression}` around field `{field}`")]
    UnsupportedWrapper { field: String, expression: String },

    #[error("helper is outside the collection schema object")]
    OutsideSchema,
}

/// A helper occurrence that was dropped instead of guessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve {kind} helper at byte {offset}: {reason}")]
pub struct PathResolutionFailure {
    pub kind: HelperKind,
    pub offset: usize,
    /// Path segments found before resolution stopped, innermost last.
    pub partial_path: Option<String>,
    pub reason: ResolveFailureReason,
}

/// Terminal error of [`crate::merge`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    #[error("No schema available for collection `{collection}`: {reason}")]
    NoSchemaAvailable {
        collection: String,
        reason: String,
        /// Why the JSON-Schema could not be used, if one was supplied.
        json_schema_error: Option<StructuralParseError>,
    },
}
