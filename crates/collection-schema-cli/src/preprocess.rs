//! Comment stripping for declarative schema sources.
//!
//! Comments are blanked out rather than removed so that byte offsets reported by
//! the extractor still point into the original file. Newlines inside block
//! comments are kept for the same reason.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String(u8),
    LineComment,
    BlockComment,
}

/// Replace `//` and `/* */` comments with spaces, leaving string literals intact.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = State::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    state = State::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'\'' | b'"' | b'`', _) => {
                    state = State::String(b);
                    out.push(b);
                }
                _ => out.push(b),
            },
            State::String(quote) => {
                out.push(b);
                if b == b'\\' {
                    if let Some(escaped) = next {
                        out.push(escaped);
                        i += 2;
                        continue;
                    }
                } else if b == quote {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                    out.push(b);
                } else {
                    out.push(blank(b));
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = State::Code;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                out.push(blank(b));
            }
        }
        i += 1;
    }

    // Comment bytes become ASCII spaces and all other bytes are copied whole.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Keep line structure, blank everything else. Multi-byte characters become
/// one space per byte so offsets stay aligned.
fn blank(b: u8) -> u8 {
    match b {
        b'\n' | b'\r' => b,
        _ => b' ',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_line_and_block_comments() {
        let source = "a: image(), // cover: image()\n/* b: reference('x') */c: z.string()";
        let stripped = strip_comments(source);
        assert_eq!(stripped.len(), source.len());
        assert!(!stripped.contains("cover"));
        assert!(!stripped.contains("reference"));
        assert!(stripped.starts_with("a: image(),"));
        assert_eq!(&stripped[stripped.find("c:").unwrap()..], "c: z.string()");
        assert_eq!(stripped.find("c:"), source.find("c:"));
    }

    #[test]
    fn test_keeps_comment_markers_inside_strings() {
        let source = r#"url: z.string().default('https://example.com'), note: z.string().describe("/* keep */")"#;
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_escaped_quotes_do_not_end_strings() {
        let source = r#"a: z.string().default('it\'s // fine') // gone"#;
        let stripped = strip_comments(source);
        assert!(stripped.contains("it\\'s // fine"));
        assert!(!stripped.contains("gone"));
    }

    #[test]
    fn test_block_comment_keeps_newlines() {
        let source = "a: image(),\n/* one\ntwo */\nb: image()";
        let stripped = strip_comments(source);
        assert_eq!(stripped.lines().count(), source.lines().count());
        assert_eq!(stripped.find("b:"), source.find("b:"));
    }

    #[test]
    fn test_non_ascii_comment_keeps_offsets() {
        let source = "// café\nhero: image()";
        let stripped = strip_comments(source);
        assert_eq!(stripped.find("hero"), source.find("hero"));
    }
}
