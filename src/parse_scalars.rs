//! Scalar tag resolution.
//!
//! Two steps happen here:
//! - [`implicit_tag`] assigns a YAML 1.2 core-schema tag to an untagged plain
//!   scalar while the tree is built.
//! - [`resolve_scalar`] turns a `(tag, raw text)` pair into a [`Value`] during
//!   the walk. It is strict: text that does not parse under its tag is an
//!   error, never a silent string.

use crate::document::Value;
use crate::error::{Error, Result};
use crate::tags::ScalarTag;

/// Resolve a tagged scalar into a concrete value.
///
/// - `Str` and `Timestamp` keep the raw text.
/// - `Bool` accepts `1 t T TRUE true True` / `0 f F FALSE false False`.
/// - `Int` is base 10, optionally signed. It resolves to `Int` when it fits
///   `i64`, to `Uint` when it is non-negative and fits `u64`, and fails
///   otherwise. Large integers never degrade to floats.
/// - `Float` is any decimal/exponent form plus the YAML `.inf`/`.nan` spellings.
/// - `Null` yields null whatever the text says.
/// - `Other` always fails.
pub fn resolve_scalar(tag: &ScalarTag, raw: &str) -> Result<Value> {
    match tag {
        ScalarTag::Str | ScalarTag::Timestamp => Ok(Value::String(raw.to_owned())),
        ScalarTag::Bool => parse_strict_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| Error::tag(tag.as_str(), raw, "expecting bool content")),
        ScalarTag::Int => parse_decimal_int(raw).ok_or_else(|| {
            Error::tag(tag.as_str(), raw, "expecting base-10 integer content within 64 bits")
        }),
        ScalarTag::Float => parse_yaml12_f64(raw)
            .map(Value::Float)
            .ok_or_else(|| Error::tag(tag.as_str(), raw, "expecting float content")),
        ScalarTag::Null => Ok(Value::Null),
        ScalarTag::Other(name) => Err(Error::tag(name.as_str(), raw, "tag is not supported")),
    }
}

/// Parse a boolean without any YAML 1.1 (`yes`/`on`) or locale forms.
pub(crate) fn parse_strict_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse `[-+]?[0-9]+` into `i64`, failing on overflow or any other form.
pub(crate) fn parse_decimal_i64(s: &str) -> Option<i64> {
    let (neg, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return None;
    }
    // Accumulate as negative so that i64::MIN is reachable.
    let mut val: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return None;
        }
        val = val.checked_mul(10)?.checked_sub((b - b'0') as i64)?;
    }
    if neg { Some(val) } else { val.checked_neg() }
}

/// `i64` first, then `u64` for non-negative values past `i64::MAX`.
pub(crate) fn parse_decimal_int(s: &str) -> Option<Value> {
    if let Some(i) = parse_decimal_i64(s) {
        return Some(Value::Int(i));
    }
    parse_decimal_u64(s).map(Value::Uint)
}

/// Parse `+?[0-9]+` into `u64`.
pub(crate) fn parse_decimal_u64(s: &str) -> Option<u64> {
    let digits = s.strip_prefix('+').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Accepted float text:
/// - the YAML spellings `.nan`, `.inf`, `+.inf`, `-.inf` (lower, title or
///   upper case);
/// - `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`.
///
/// Bare `inf`/`nan`/`infinity` and hex floats are rejected.
pub(crate) fn parse_yaml12_f64(s: &str) -> Option<f64> {
    match s {
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        _ if is_core_float(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// Tag for an untagged plain scalar, per the YAML 1.2 core schema.
///
/// `<<` stays a string: merge keys are not expanded.
pub(crate) fn implicit_tag(s: &str) -> ScalarTag {
    match s {
        "" | "~" | "null" | "Null" | "NULL" => return ScalarTag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return ScalarTag::Bool,
        ".nan" | ".NaN" | ".NAN" | ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF"
        | "-.inf" | "-.Inf" | "-.INF" => return ScalarTag::Float,
        _ => {}
    }
    // Out-of-range integers keep the int tag and fail when resolved.
    if is_decimal_int(s) {
        return ScalarTag::Int;
    }
    if is_core_float(s) {
        return ScalarTag::Float;
    }
    if looks_like_timestamp(s) {
        return ScalarTag::Timestamp;
    }
    ScalarTag::Str
}

fn strip_sign(s: &[u8]) -> &[u8] {
    match s.first() {
        Some(b'-' | b'+') => &s[1..],
        _ => s,
    }
}

fn is_decimal_int(s: &str) -> bool {
    let digits = strip_sign(s.as_bytes());
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_core_float(s: &str) -> bool {
    let b = strip_sign(s.as_bytes());
    let mut i = 0;
    let int_digits = count_digits(&b[i..]);
    i += int_digits;
    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(&b[i..]);
        i += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'-' | b'+')) {
            i += 1;
        }
        let exp_digits = count_digits(&b[i..]);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }
    i == b.len()
}

fn count_digits(b: &[u8]) -> usize {
    b.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// Matches the YAML timestamp forms: `2001-12-14`, `2001-12-14t21:59:43.10-05:00`,
/// `2001-12-14 21:59:43.10 -5`, `2001-12-15T02:59:43.1Z`.
///
/// Only the shape is checked; the text is never interpreted as a date.
pub(crate) fn looks_like_timestamp(s: &str) -> bool {
    let b = s.as_bytes();
    let mut cur = Cursor { b, i: 0 };

    if !(cur.digits(4, 4) && cur.byte(b'-') && cur.digits(1, 2) && cur.byte(b'-')) {
        return false;
    }
    let day_start = cur.i;
    if !cur.digits(1, 2) {
        return false;
    }
    if cur.done() {
        // Date-only form requires the two-digit month and day.
        return cur.i - day_start == 2 && b[5].is_ascii_digit() && b[6].is_ascii_digit();
    }

    if !(cur.byte(b'T') || cur.byte(b't') || cur.spaces() > 0) {
        return false;
    }
    if !(cur.digits(1, 2) && cur.byte(b':') && cur.digits(2, 2) && cur.byte(b':') && cur.digits(2, 2)) {
        return false;
    }
    if cur.byte(b'.') {
        cur.digits(0, usize::MAX);
    }
    cur.spaces();
    if cur.done() {
        return true;
    }
    if cur.byte(b'Z') {
        return cur.done();
    }
    if cur.byte(b'+') || cur.byte(b'-') {
        if !cur.digits(1, 2) {
            return false;
        }
        if cur.byte(b':') && !cur.digits(2, 2) {
            return false;
        }
        return cur.done();
    }
    false
}

struct Cursor<'a> {
    b: &'a [u8],
    i: usize,
}

impl Cursor<'_> {
    fn done(&self) -> bool {
        self.i == self.b.len()
    }

    fn byte(&mut self, want: u8) -> bool {
        if self.b.get(self.i) == Some(&want) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    fn digits(&mut self, min: usize, max: usize) -> bool {
        let n = count_digits(&self.b[self.i..]).min(max);
        self.i += n;
        n >= min
    }

    fn spaces(&mut self) -> usize {
        let n = self.b[self.i..]
            .iter()
            .take_while(|c| matches!(c, b' ' | b'\t'))
            .count();
        self.i += n;
        n
    }
}
