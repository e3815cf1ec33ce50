//! Lexical scan for the two helper call shapes.

use regex::Regex;

use crate::config::Config;

/// Which helper a call site uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Image,
    Reference,
}

impl std::fmt::Display for HelperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HelperKind::Image => f.write_str("image"),
            HelperKind::Reference => f.write_str("reference"),
        }
    }
}

/// A located helper call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperOccurrence {
    pub kind: HelperKind,
    /// Byte offset of the helper name.
    pub offset: usize,
    /// Byte offset just past the call's closing parenthesis.
    pub end: usize,
    /// Collection named by a reference call.
    pub argument: Option<String>,
}

/// Finds `image()` and `reference('<collection>')` call sites.
///
/// Matches are purely lexical: a helper call spelled inside an unrelated string
/// literal is reported like any other. Member calls such as `z.image()` are not
/// helper calls and are skipped.
#[derive(Debug, Clone)]
pub struct HelperLocator {
    image: Regex,
    reference: Regex,
}

impl HelperLocator {
    pub fn new(config: &Config) -> Self {
        // Helper names are escaped, so the patterns always compile.
        let image = Regex::new(&format!(
            r"(?:^|[^.\w$])({})\s*\(\s*\)",
            regex::escape(&config.image_helper)
        ))
        .expect("escaped image helper pattern");
        let reference = Regex::new(&format!(
            r#"(?:^|[^.\w$])({})\s*\(\s*(?:'([^'\n]*)'|"([^"\n]*)")\s*\)"#,
            regex::escape(&config.reference_helper)
        ))
        .expect("escaped reference helper pattern");
        Self { image, reference }
    }

    /// All occurrences in `source`, ordered by offset.
    pub fn locate(&self, source: &str) -> Vec<HelperOccurrence> {
        let images = self.image.captures_iter(source).filter_map(|caps| {
            Some(HelperOccurrence {
                kind: HelperKind::Image,
                offset: caps.get(1)?.start(),
                end: caps.get(0)?.end(),
                argument: None,
            })
        });

        let references = self.reference.captures_iter(source).filter_map(|caps| {
            let name = caps.get(2).or_else(|| caps.get(3))?;
            Some(HelperOccurrence {
                kind: HelperKind::Reference,
                offset: caps.get(1)?.start(),
                end: caps.get(0)?.end(),
                argument: Some(name.as_str().to_string()),
            })
        });

        let mut occurrences: Vec<_> = images.chain(references).collect();
        occurrences.sort_by_key(|o| o.offset);
        occurrences
    }
}
