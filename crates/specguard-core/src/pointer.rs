//! Pointer expressions — the document's internal cross-reference syntax
//!
//! A pointer expression is a `#/`-prefixed, `/`-delimited key sequence
//! (`#/components/schemas/Scope`). Inside a key, `~1` unescapes to `/`
//! and `~0` to `~`; `#` alone designates the document root.
//!
//! Reference equality is canonical-string equality: an authored pointer
//! is parsed and re-encoded before comparison, so only genuine
//! in-document pointers ever compare equal, and two distinct locations
//! never do, even when the nodes they designate have equal content.

/// Parse a pointer expression into its key sequence.
///
/// Returns `None` when the expression is not an in-document pointer:
/// missing `#` prefix (an external URL or file reference) or an invalid
/// escape. Cross-document references are out of scope for resolution
/// and are treated as dangling by the resolver.
pub fn parse(expr: &str) -> Option<Vec<String>> {
    let rest = expr.strip_prefix('#')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let rest = rest.strip_prefix('/')?;
    let mut segments = Vec::new();
    for raw in rest.split('/') {
        segments.push(unescape(raw)?);
    }
    Some(segments)
}

/// Encode a key sequence as a canonical pointer string.
pub fn encode<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "#".to_string();
    }
    let mut out = String::from("#");
    for segment in segments {
        out.push('/');
        push_escaped(segment.as_ref(), &mut out);
    }
    out
}

/// Canonical form of an authored pointer expression, if it is one.
pub fn canonicalize(expr: &str) -> Option<String> {
    parse(expr).map(|segments| encode(&segments))
}

fn push_escaped(key: &str, out: &mut String) {
    for ch in key.chars() {
        match ch {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            ch => out.push(ch),
        }
    }
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pointer() {
        assert_eq!(
            parse("#/components/schemas/Scope"),
            Some(vec![
                "components".to_string(),
                "schemas".to_string(),
                "Scope".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_root_pointer() {
        assert_eq!(parse("#"), Some(vec![]));
    }

    #[test]
    fn test_parse_unescapes_slash_and_tilde() {
        assert_eq!(
            parse("#/paths/~1analysis~1run"),
            Some(vec!["paths".to_string(), "/analysis/run".to_string()])
        );
        assert_eq!(
            parse("#/keys/a~0b"),
            Some(vec!["keys".to_string(), "a~b".to_string()])
        );
    }

    #[test]
    fn test_parse_rejects_external_references() {
        assert!(parse("http://example.com/spec.json#/components").is_none());
        assert!(parse("other.json#/components/schemas/Scope").is_none());
        assert!(parse("components/schemas/Scope").is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_escape() {
        assert!(parse("#/bad~2escape").is_none());
        assert!(parse("#/trailing~").is_none());
    }

    #[test]
    fn test_encode_escapes_slash_and_tilde() {
        assert_eq!(
            encode(&["paths", "/analysis/run"]),
            "#/paths/~1analysis~1run"
        );
        assert_eq!(encode(&["keys", "a~b"]), "#/keys/a~0b");
    }

    #[test]
    fn test_encode_root() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&empty), "#");
    }

    #[test]
    fn test_round_trip_preserves_segments() {
        let segments = vec!["paths".to_string(), "/a/~b".to_string(), "get".to_string()];
        let parsed = parse(&encode(&segments)).expect("canonical pointer should parse");
        assert_eq!(parsed, segments);
    }

    #[test]
    fn test_canonicalize_is_identity_on_canonical_input() {
        let ptr = "#/components/schemas/Scope";
        assert_eq!(canonicalize(ptr).as_deref(), Some(ptr));
    }

    #[test]
    fn test_canonicalize_distinct_locations_differ() {
        assert_ne!(
            canonicalize("#/components/schemas/Scope"),
            canonicalize("#/components/schemas/ScopeV2")
        );
    }
}
