//! Backward brace walk from a helper call to its dotted field path.
//!
//! The walk never tokenizes the source. From the helper offset it looks for the
//! nearest `key:` at the same brace depth, then repeatedly steps out of the
//! enclosing `{` and looks for the key owning that object literal, until the
//! collection's root object is reached.

use std::sync::LazyLock;

use regex::Regex;

use crate::declarative::locator::HelperOccurrence;
use crate::error::{PathResolutionFailure, ResolveFailureReason};

static SCHEMA_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bschema\s*:").expect("valid schema key pattern"));

static OBJECT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:object|strictObject|looseObject)\s*\(\s*\{").expect("valid object pattern")
});

/// Calls that construct an object schema from a literal.
const OBJECT_CALLS: &[&str] = &["object", "strictObject", "looseObject"];

/// Calls that do not change which field a value belongs to.
const TRANSPARENT_CALLS: &[&str] = &["optional", "nullable", "nullish"];

/// Chained methods that turn a value into a union.
const COMBINATOR_METHODS: &[&str] = &["or", "and"];

/// A helper occurrence traced to its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    /// The helper is the element argument of an array field.
    pub array_wrapped: bool,
}

/// Span of the collection's root object literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SchemaRoot {
    open: usize,
    close: usize,
}

/// `name:` found while walking backwards.
#[derive(Debug)]
struct Key {
    name: String,
    start: usize,
    value_start: usize,
}

/// Method calls chained onto a value, as in `image().optional().array()`.
#[derive(Debug, Default, PartialEq, Eq)]
struct Chain {
    arrays: usize,
    combinator: bool,
    /// Bytes covered by the chain.
    len: usize,
}

/// Call chain between a key's colon and what follows it.
#[derive(Debug, PartialEq, Eq)]
enum ValueShape {
    Direct,
    Array,
    Object,
    ArrayOfObjects,
    Unsupported,
}

pub struct PathResolver<'a> {
    source: &'a str,
    root: Option<SchemaRoot>,
}

impl<'a> PathResolver<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            root: find_schema_root(source),
        }
    }

    /// Byte span of the root object literal, braces included.
    pub fn root_span(&self) -> Option<std::ops::Range<usize>> {
        self.root.map(|r| r.open..r.close + 1)
    }

    pub fn resolve(
        &self,
        occurrence: &HelperOccurrence,
    ) -> Result<ResolvedPath, PathResolutionFailure> {
        let mut segments: Vec<String> = Vec::new();
        let fail = |reason: ResolveFailureReason, segments: &[String]| PathResolutionFailure {
            kind: occurrence.kind,
            offset: occurrence.offset,
            partial_path: (!segments.is_empty()).then(|| join_outermost_first(segments)),
            reason,
        };

        let offset = occurrence.offset;
        if self
            .root
            .is_some_and(|root| offset <= root.open || offset >= root.close)
        {
            return Err(fail(ResolveFailureReason::OutsideSchema, &segments));
        }

        let key = self
            .enclosing_key(offset)
            .ok_or_else(|| fail(ResolveFailureReason::NoEnclosingField, &segments))?;
        let chain = trailing_chain(&self.source[occurrence.end..]);
        let outer_arrays = match classify(&self.source[key.value_start..offset]) {
            ValueShape::Direct => Some(0),
            ValueShape::Array => Some(1),
            _ => None,
        };
        let array_wrapped = match outer_arrays.map(|n| n + chain.arrays) {
            Some(arrays @ (0 | 1)) if !chain.combinator => arrays == 1,
            _ => {
                let expression = &self.source[key.value_start..occurrence.end + chain.len];
                let reason = ResolveFailureReason::UnsupportedWrapper {
                    field: key.name.clone(),
                    expression: expression.trim().to_string(),
                };
                return Err(fail(reason, &segments));
            }
        };
        let mut cursor = key.start;
        segments.push(key.name);

        loop {
            let Some(open) = self.enclosing_open_brace(cursor) else {
                if self.root.is_some() {
                    return Err(fail(ResolveFailureReason::OutsideSchema, &segments));
                }
                break;
            };
            if let Some(root) = self.root {
                if open == root.open {
                    break;
                }
                if open < root.open {
                    return Err(fail(ResolveFailureReason::OutsideSchema, &segments));
                }
            }

            let Some(parent) = self.enclosing_key(open) else {
                if self.root.is_none() {
                    break;
                }
                return Err(fail(ResolveFailureReason::NoEnclosingField, &segments));
            };
            let expression = &self.source[parent.value_start..open];
            let shape = match classify(expression) {
                ValueShape::Object if self.object_is_array(open) => ValueShape::ArrayOfObjects,
                shape => shape,
            };
            match shape {
                ValueShape::Object => {}
                ValueShape::ArrayOfObjects => {
                    let reason = ResolveFailureReason::ArrayOfObjects {
                        field: parent.name.clone(),
                    };
                    return Err(fail(reason, &segments));
                }
                _ if self.root.is_none() => break,
                _ => {
                    let reason = ResolveFailureReason::UnsupportedWrapper {
                        field: parent.name.clone(),
                        expression: expression.trim().to_string(),
                    };
                    return Err(fail(reason, &segments));
                }
            }
            cursor = parent.start;
            segments.push(parent.name);
        }

        Ok(ResolvedPath {
            path: join_outermost_first(&segments),
            array_wrapped,
        })
    }

    /// Whether the object literal opened at `open` is followed by `.array()`,
    /// as in `z.object({ ... }).array()`.
    fn object_is_array(&self, open: usize) -> bool {
        let bytes = self.source.as_bytes();
        let Some(close) = matching_close(bytes, open) else {
            return false;
        };
        match self.source[close + 1..].trim_start().strip_prefix(')') {
            Some(rest) => trailing_chain(rest).arrays > 0,
            None => false,
        }
    }

    /// Nearest `key:` before `end` at the same brace depth.
    fn enclosing_key(&self, end: usize) -> Option<Key> {
        let bytes = self.source.as_bytes();
        let mut depth = 0usize;
        let mut i = end;
        while i > 0 {
            i -= 1;
            match bytes[i] {
                b'}' => depth += 1,
                b'{' => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                b':' if depth == 0 => {
                    if let Some(key) = self.key_before_colon(i) {
                        return Some(key);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// The unmatched `{` enclosing `end`.
    fn enclosing_open_brace(&self, end: usize) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut depth = 0usize;
        let mut i = end;
        while i > 0 {
            i -= 1;
            match bytes[i] {
                b'}' => depth += 1,
                b'{' if depth == 0 => return Some(i),
                b'{' => depth -= 1,
                _ => {}
            }
        }
        None
    }

    /// Property name ending right before the colon at `colon`, if it is one.
    fn key_before_colon(&self, colon: usize) -> Option<Key> {
        let bytes = self.source.as_bytes();
        let end = skip_whitespace_back(bytes, colon);
        if end == 0 {
            return None;
        }

        let (name, start) = match bytes[end - 1] {
            quote @ (b'\'' | b'"') => {
                let open = bytes[..end - 1].iter().rposition(|b| *b == quote)?;
                (&self.source[open + 1..end - 1], open)
            }
            _ => {
                let mut start = end;
                while start > 0 && is_ident_byte(bytes[start - 1]) {
                    start -= 1;
                }
                let name = &self.source[start..end];
                if name.is_empty() || name.as_bytes()[0].is_ascii_digit() {
                    return None;
                }
                (name, start)
            }
        };

        let before = skip_whitespace_back(bytes, start);
        if before > 0 && !matches!(bytes[before - 1], b'{' | b',') {
            return None;
        }
        Some(Key {
            name: name.to_string(),
            start,
            value_start: colon + 1,
        })
    }
}

fn find_schema_root(source: &str) -> Option<SchemaRoot> {
    let from = SCHEMA_KEY.find(source).map_or(0, |m| m.end());
    let object = OBJECT_OPEN.find_at(source, from)?;
    let open = object.end() - 1;

    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut close = bytes.len();
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = i;
                    break;
                }
            }
            _ => {}
        }
    }
    Some(SchemaRoot { open, close })
}

/// Classify a chain like `z.optional(z.array(` by the calls it opens.
fn classify(expression: &str) -> ValueShape {
    let Some(calls) = open_calls(expression) else {
        return ValueShape::Unsupported;
    };
    let (is_object, body) = match calls.split_last() {
        Some((last, body)) if OBJECT_CALLS.contains(last) => (true, body),
        _ => (false, calls.as_slice()),
    };

    let mut arrays = 0;
    for call in body {
        if *call == "array" {
            arrays += 1;
        } else if !TRANSPARENT_CALLS.contains(call) {
            return ValueShape::Unsupported;
        }
    }

    match (is_object, arrays) {
        (false, 0) => ValueShape::Direct,
        (false, 1) => ValueShape::Array,
        (true, 0) => ValueShape::Object,
        (true, _) => ValueShape::ArrayOfObjects,
        _ => ValueShape::Unsupported,
    }
}

/// Names of the calls opened by `expression`, which must consist only of
/// `path.to.fn(` segments. `None` if anything else appears.
fn open_calls(expression: &str) -> Option<Vec<&str>> {
    let mut calls = Vec::new();
    let mut rest = expression.trim_start();
    while !rest.is_empty() {
        let path_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'))
            .unwrap_or(rest.len());
        let path = &rest[..path_len];
        if path.is_empty() {
            return None;
        }
        let after = rest[path_len..].trim_start();
        let after = after.strip_prefix('(')?;
        calls.push(path.rsplit('.').next().unwrap_or(path));
        rest = after.trim_start();
    }
    Some(calls)
}

/// Read `.method(...)` calls from the start of `rest`.
fn trailing_chain(rest: &str) -> Chain {
    let bytes = rest.as_bytes();
    let mut chain = Chain::default();
    loop {
        let mut i = skip_whitespace(bytes, chain.len);
        if bytes.get(i) != Some(&b'.') {
            break;
        }
        i = skip_whitespace(bytes, i + 1);
        let name_start = i;
        while i < bytes.len() && is_ident_byte(bytes[i]) {
            i += 1;
        }
        let name = &rest[name_start..i];
        i = skip_whitespace(bytes, i);
        if name.is_empty() || bytes.get(i) != Some(&b'(') {
            break;
        }
        let Some(close) = matching_close(bytes, i) else {
            break;
        };

        if name == "array" {
            chain.arrays += 1;
        } else if COMBINATOR_METHODS.contains(&name) {
            chain.combinator = true;
        }
        chain.len = close + 1;
    }
    chain
}

/// Index of the bracket closing the one at `open`. String literals are skipped.
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let (opener, closer) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if matches!(b, b'\'' | b'"' | b'`') => quote = Some(b),
            None if b == opener => depth += 1,
            None if b == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            None => {}
        }
        i += 1;
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut start: usize) -> usize {
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    start
}

fn skip_whitespace_back(bytes: &[u8], mut end: usize) -> usize {
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn join_outermost_first(segments: &[String]) -> String {
    segments
        .iter()
        .rev()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(".")
}
