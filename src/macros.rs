//! Public macros for constructing option structs without struct literal syntax,
//! so that fields can be added to them without breaking call sites.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = mapslice::options! {
///     max_depth: 64,
/// };
/// assert_eq!(options.max_depth, 64);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::Budget`] from `Default` and a list of field assignments.
///
/// ```rust
/// let budget = mapslice::budget! {
///     max_aliases: 10,
///     enforce_alias_anchor_ratio: false,
/// };
/// assert_eq!(budget.max_aliases, 10);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        budget
    }};
}
