//! Schema acquisition and normalization for content collections
//!
//! A collection's field list is assembled from two sources:
//!
//! - the generated JSON-Schema, which is precise about structure, types,
//!   required-ness and constraints ([`parse`]);
//! - the declarative schema source, scanned for the `image()` and
//!   `reference('<collection>')` helpers the JSON-Schema erases ([`declarative`]).
//!
//! [`merge`] combines both and degrades to the declarative annotations alone
//! when the JSON-Schema is missing or unusable. Nothing here performs I/O.

pub mod config;
pub mod declarative;
pub mod error;
pub mod field;
pub mod json_schema;
pub mod label;
pub mod merge;
pub mod parse;

pub use config::{Config, DescriptionSource};
pub use declarative::{Annotation, Extraction, FieldAnnotation, extract_annotations};
pub use error::{MergeError, PathResolutionFailure, ResolveFailureReason, StructuralParseError};
pub use field::{CompleteSchema, FieldConstraints, FieldType, SchemaField};
pub use merge::{Diagnostic, Fidelity, MergedSchema, SchemaMerger, merge};
pub use parse::parse_json_schema;
