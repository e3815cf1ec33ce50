//! Image and reference annotations from the declarative schema source.
//!
//! The source is never parsed. [`HelperLocator`] finds the helper calls and
//! [`PathResolver`] traces each one to the field it annotates. Occurrences that
//! cannot be traced are reported and skipped.

pub mod locator;
pub mod resolver;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PathResolutionFailure;

pub use locator::{HelperKind, HelperLocator, HelperOccurrence};
pub use resolver::{PathResolver, ResolvedPath};

/// Type override carried by an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Image,
    Reference { collection: String },
}

/// A resolved helper occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAnnotation {
    pub path: String,
    pub annotation: Annotation,
    /// The helper is the element type of an array field.
    pub array_wrapped: bool,
    pub offset: usize,
}

/// Result of one extractor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Annotations in source order.
    pub annotations: Vec<FieldAnnotation>,
    pub failures: Vec<PathResolutionFailure>,
}

#[derive(Debug, Clone)]
pub struct DeclarativeExtractor {
    locator: HelperLocator,
}

impl DeclarativeExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            locator: HelperLocator::new(config),
        }
    }

    /// Collect annotations from comment-stripped declarative source.
    pub fn extract(&self, collection: &str, source: &str) -> Extraction {
        let resolver = PathResolver::new(source);
        let mut extraction = Extraction::default();

        for occurrence in self.locator.locate(source) {
            match resolver.resolve(&occurrence) {
                Ok(resolved) => {
                    let annotation = match occurrence.argument {
                        Some(target) => Annotation::Reference { collection: target },
                        None => Annotation::Image,
                    };
                    debug!(
                        collection,
                        path = %resolved.path,
                        offset = occurrence.offset,
                        array = resolved.array_wrapped,
                        "resolved {} helper",
                        occurrence.kind
                    );
                    extraction.annotations.push(FieldAnnotation {
                        path: resolved.path,
                        annotation,
                        array_wrapped: resolved.array_wrapped,
                        offset: occurrence.offset,
                    });
                }
                Err(failure) => {
                    warn!(
                        collection,
                        path = failure.partial_path.as_deref().unwrap_or(""),
                        offset = failure.offset,
                        helper = %failure.kind,
                        "{failure}"
                    );
                    extraction.failures.push(failure);
                }
            }
        }
        extraction
    }
}

/// One-shot extraction with the given configuration.
pub fn extract_annotations(collection: &str, source: &str, config: &Config) -> Extraction {
    DeclarativeExtractor::new(config).extract(collection, source)
}
