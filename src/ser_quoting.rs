//! Quoting decisions for emitted string scalars.

use crate::parse_scalars::{implicit_tag, resolve_scalar};
use crate::tags::ScalarTag;

/// Characters that may not start a plain scalar.
fn is_indicator(b: u8) -> bool {
    matches!(
        b,
        b'-' | b'?'
            | b':'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b','
            | b'#'
            | b'&'
            | b'*'
            | b'!'
            | b'|'
            | b'>'
            | b'\''
            | b'"'
            | b'%'
            | b'@'
            | b'`'
    )
}

/// Shape checks shared by keys and values.
fn is_plain_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    if first.is_ascii_whitespace() || last.is_ascii_whitespace() || is_indicator(*first) {
        return false;
    }
    // Document markers at column 0 end or start a document.
    if s.starts_with("...") || s.starts_with("---") {
        return false;
    }
    if s.chars().any(char::is_control) {
        return false;
    }
    !(s.contains(": ") || s.contains(" #") || s.ends_with(':'))
}

/// YAML 1.1 booleans. Core-schema parsers read them as strings, but older
/// readers of the emitted text may not.
fn is_yaml11_bool(s: &str) -> bool {
    ["y", "yes", "n", "no", "on", "off"]
        .iter()
        .any(|b| s.eq_ignore_ascii_case(b))
}

/// True if `s` can be written as a plain scalar in VALUE position and still
/// read back as the same string.
pub(crate) fn is_plain_value_safe(s: &str) -> bool {
    is_plain_shape(s) && !is_yaml11_bool(s) && implicit_tag(s) == ScalarTag::Str
}

/// True if `s` can be written as a plain mapping key.
///
/// Keys keep their raw text when read back as long as they resolve to a
/// string, integer or float, so numeric-looking keys may stay plain unless
/// they are out of range. Keys are stricter than values about `:` since
/// `a:b: c` is hard to read.
pub(crate) fn is_plain_key_safe(s: &str) -> bool {
    if !is_plain_shape(s) || s.contains(':') || is_yaml11_bool(s) {
        return false;
    }
    let tag = implicit_tag(s);
    tag.is_key_tag() && resolve_scalar(&tag, s).is_ok()
}

/// Append `s` as a double-quoted YAML scalar.
pub(crate) fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{FEFF}' => out.push_str("\\uFEFF"),
            '\u{0085}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if (c as u32) <= 0xFF && c.is_control() => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_that_would_change_type_are_quoted() {
        for s in ["", "true", "null", "~", "42", "1.5", ".inf", "yes", "2001-12-14"] {
            assert!(!is_plain_value_safe(s), "{s:?} should be quoted");
        }
        for s in ["petstore", "a b", "http://x", "v1.2.3", "x-y"] {
            assert!(is_plain_value_safe(s), "{s:?} should be plain");
        }
    }

    #[test]
    fn structural_text_is_quoted() {
        for s in ["- a", "a: b", "a #b", "#c", " lead", "trail ", "a\nb", "&x", "*x", "[1]"] {
            assert!(!is_plain_value_safe(s), "{s:?} should be quoted");
        }
    }

    #[test]
    fn document_markers_are_quoted() {
        for s in ["...", "... x", "...x", "---", "--- x"] {
            assert!(!is_plain_value_safe(s), "{s:?} should be quoted");
            assert!(!is_plain_key_safe(s), "{s:?} should be quoted as a key");
        }
        assert!(is_plain_value_safe("..x"));
        assert!(is_plain_key_safe("x..."));
    }

    #[test]
    fn numeric_keys_may_stay_plain() {
        assert!(is_plain_key_safe("200"));
        assert!(is_plain_key_safe("1.50"));
        assert!(is_plain_key_safe("18446744073709551615"));
        assert!(!is_plain_key_safe("18446744073709551616"));
        assert!(!is_plain_key_safe("true"));
        assert!(!is_plain_key_safe("a:b"));
        assert!(!is_plain_key_safe(""));
    }

    #[test]
    fn quoting_escapes_specials() {
        let mut out = String::new();
        push_quoted(&mut out, "a\"b\\c\n\u{1}");
        assert_eq!(out, r#""a\"b\\c\n\x01""#);
    }
}
