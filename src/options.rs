use serde::{Deserialize, Serialize};

use crate::budget::Budget;

/// Limits applied to alias expansion during the walk, to harden against
/// alias bombs that stay within the parser budget.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AliasLimits {
    /// Maximum total number of alias expansions in one walk.
    pub max_total_expansions: usize,
    /// Maximum number of times a single anchored node may be expanded.
    /// Use `usize::MAX` for "unlimited".
    pub max_expansions_per_anchor: usize,
}

impl Default for AliasLimits {
    fn default() -> Self {
        Self {
            max_total_expansions: 1_000_000,
            max_expansions_per_anchor: usize::MAX,
        }
    }
}

/// Conversion options.
///
/// ```rust
/// let options = mapslice::options! {
///     max_depth: 32,
/// };
///
/// let doc = mapslice::yaml_to_document_with_options(b"name: petstore\n", &options).unwrap();
/// assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("petstore"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Optional budget enforced on the raw parser events. `None` disables it.
    pub budget: Option<Budget>,
    /// Maximum nesting depth (aliases included) accepted by the walker, the
    /// reverse converter, the key normalizer and the emitter.
    pub max_depth: usize,
    /// Alias expansion limits for the walker.
    pub alias_limits: AliasLimits,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            max_depth: 2_000,
            alias_limits: AliasLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert!(opts.budget.is_some());
        assert_eq!(opts.max_depth, 2_000);
        assert_eq!(opts.alias_limits.max_total_expansions, 1_000_000);
        assert_eq!(opts.alias_limits.max_expansions_per_anchor, usize::MAX);
    }

    #[test]
    fn options_macro_overrides_fields() {
        let opts = crate::options! {
            budget: None,
            max_depth: 8,
        };
        assert!(opts.budget.is_none());
        assert_eq!(opts.max_depth, 8);
    }

    #[test]
    fn options_deserialize_from_json() {
        let opts: Options = serde_json::from_str(
            r#"{"budget":null,"max_depth":5,"alias_limits":{"max_total_expansions":3,"max_expansions_per_anchor":1}}"#,
        )
        .unwrap();
        assert_eq!(opts.max_depth, 5);
        assert_eq!(opts.alias_limits.max_expansions_per_anchor, 1);
    }
}
