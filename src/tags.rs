use std::fmt;

pub(crate) const TAG_STR: &str = "!!str";
pub(crate) const TAG_STR_SHORTHAND: &str = "!str";
pub(crate) const TAG_STR_CANONICAL: &str = "tag:yaml.org,2002:str";
pub(crate) const TAG_STR_CANONICAL_ALT: &str = "tag:yaml.org,2002:!str";

pub(crate) const TAG_INT: &str = "!!int";
pub(crate) const TAG_INT_SHORTHAND: &str = "!int";
pub(crate) const TAG_INT_CANONICAL: &str = "tag:yaml.org,2002:int";
pub(crate) const TAG_INT_CANONICAL_ALT: &str = "tag:yaml.org,2002:!int";

pub(crate) const TAG_FLOAT: &str = "!!float";
pub(crate) const TAG_FLOAT_SHORTHAND: &str = "!float";
pub(crate) const TAG_FLOAT_CANONICAL: &str = "tag:yaml.org,2002:float";
pub(crate) const TAG_FLOAT_CANONICAL_ALT: &str = "tag:yaml.org,2002:!float";

pub(crate) const TAG_BOOL: &str = "!!bool";
pub(crate) const TAG_BOOL_SHORTHAND: &str = "!bool";
pub(crate) const TAG_BOOL_CANONICAL: &str = "tag:yaml.org,2002:bool";
pub(crate) const TAG_BOOL_CANONICAL_ALT: &str = "tag:yaml.org,2002:!bool";

pub(crate) const TAG_NULL: &str = "!!null";
pub(crate) const TAG_NULL_SHORTHAND: &str = "!null";
pub(crate) const TAG_NULL_CANONICAL: &str = "tag:yaml.org,2002:null";
pub(crate) const TAG_NULL_CANONICAL_ALT: &str = "tag:yaml.org,2002:!null";

pub(crate) const TAG_TIMESTAMP: &str = "!!timestamp";
pub(crate) const TAG_TIMESTAMP_SHORTHAND: &str = "!timestamp";
pub(crate) const TAG_TIMESTAMP_CANONICAL: &str = "tag:yaml.org,2002:timestamp";
pub(crate) const TAG_TIMESTAMP_CANONICAL_ALT: &str = "tag:yaml.org,2002:!timestamp";

/// The non-specific tag `!`, which forces a scalar to be a string.
pub(crate) const TAG_NON_SPECIFIC: &str = "!";

/// Tag carried by a scalar node.
///
/// Explicit tags are normalized from any of their accepted spellings; tags the
/// crate does not know are kept verbatim in [`ScalarTag::Other`] so that the
/// walk can reject them with the original text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarTag {
    Str,
    Bool,
    Int,
    Float,
    Timestamp,
    Null,
    Other(String),
}

impl ScalarTag {
    /// Normalize an explicit tag as rendered by the parser.
    pub(crate) fn from_explicit(tag: &str) -> Self {
        match tag {
            TAG_NON_SPECIFIC
            | TAG_STR
            | TAG_STR_SHORTHAND
            | TAG_STR_CANONICAL
            | TAG_STR_CANONICAL_ALT => ScalarTag::Str,
            TAG_INT | TAG_INT_SHORTHAND | TAG_INT_CANONICAL | TAG_INT_CANONICAL_ALT => {
                ScalarTag::Int
            }
            TAG_FLOAT | TAG_FLOAT_SHORTHAND | TAG_FLOAT_CANONICAL | TAG_FLOAT_CANONICAL_ALT => {
                ScalarTag::Float
            }
            TAG_BOOL | TAG_BOOL_SHORTHAND | TAG_BOOL_CANONICAL | TAG_BOOL_CANONICAL_ALT => {
                ScalarTag::Bool
            }
            TAG_NULL | TAG_NULL_SHORTHAND | TAG_NULL_CANONICAL | TAG_NULL_CANONICAL_ALT => {
                ScalarTag::Null
            }
            TAG_TIMESTAMP
            | TAG_TIMESTAMP_SHORTHAND
            | TAG_TIMESTAMP_CANONICAL
            | TAG_TIMESTAMP_CANONICAL_ALT => ScalarTag::Timestamp,
            other => ScalarTag::Other(other.to_owned()),
        }
    }

    /// Tags whose scalars may become mapping keys.
    pub(crate) fn is_key_tag(&self) -> bool {
        matches!(self, ScalarTag::Str | ScalarTag::Int | ScalarTag::Float)
    }

    /// Short name used in diagnostics.
    pub fn as_str(&self) -> &str {
        match self {
            ScalarTag::Str => TAG_STR,
            ScalarTag::Bool => TAG_BOOL,
            ScalarTag::Int => TAG_INT,
            ScalarTag::Float => TAG_FLOAT,
            ScalarTag::Timestamp => TAG_TIMESTAMP,
            ScalarTag::Null => TAG_NULL,
            ScalarTag::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
