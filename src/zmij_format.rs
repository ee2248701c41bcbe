//! Float rendering for reconstructed scalars.
//!
//! `zmij` produces the shortest round-trippable text, but may print `4e-6` or
//! `42`, which YAML would re-resolve as something other than a float. The
//! helpers here patch in a `.0` so the tag survives re-parsing.

use num_traits::float::FloatCore;
use zmij::Float;

/// Render `f` as a YAML 1.2 float: `42.0`, `4.0e-6`, `.inf`, `-.inf`, `.nan`.
pub(crate) fn float_to_yaml<F: Float + FloatCore>(f: F) -> String {
    let mut out = String::new();
    push_float_string(&mut out, f);
    out
}

pub(crate) fn push_float_string<F: Float + FloatCore>(target: &mut String, f: F) {
    if f.is_nan() {
        target.push_str(".nan");
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            target.push_str(".inf");
        } else {
            target.push_str("-.inf");
        }
    } else {
        let mut buf = zmij::Buffer::new();
        let s = buf.format_finite(f);
        if s.as_bytes().contains(&b'.') {
            target.push_str(s);
        } else if let Some(exp_pos) = s.find(['e', 'E']) {
            // "4e-6" -> "4.0e-6"
            target.push_str(&s[..exp_pos]);
            target.push_str(".0");
            target.push_str(&s[exp_pos..]);
        } else {
            target.push_str(s);
            target.push_str(".0");
        }
    }
}
