//! Defines error and its location
use std::fmt;

use saphyr_parser::{ScanError, Span};

use crate::budget::BudgetBreach;
use crate::document::Document;

/// Boxed error returned by transform processors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Row/column location within the source YAML document (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub(crate) row: u32,
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    ///
    /// Synthesized nodes (reverse conversion) and errors raised away from the
    /// source text carry this value.
    pub const UNKNOWN: Self = Self { row: 0, column: 0 };

    pub(crate) const fn new(row: usize, column: usize) -> Self {
        // Error reporting only; documents beyond 4G lines are not a concern.
        Self {
            row: row as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line.
    pub fn line(&self) -> u64 {
        self.row as u64
    }

    /// 1-indexed column.
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    pub fn is_known(&self) -> bool {
        self != &Location::UNKNOWN
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed `Location`.
pub(crate) fn location_from_span(span: &Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}

/// Everything that can go wrong while converting between YAML and JSON.
///
/// No variant is recovered from inside the crate: every error aborts the
/// current conversion and no partial output is produced.
#[derive(Debug)]
pub enum Error {
    /// The YAML text (or its UTF-8 encoding) is malformed.
    Scan { msg: String, location: Location },
    /// Wrong root shape, multi-child document, dangling mapping key, alias
    /// cycle or nesting deeper than the configured limit.
    Structural { msg: String, location: Location },
    /// A scalar tag is unknown, or the raw text does not parse under its tag.
    Tag {
        tag: String,
        value: String,
        reason: String,
        location: Location,
    },
    /// A mapping key has a type that cannot become a JSON object key.
    KeyType { found: String, location: Location },
    /// Two keys of a generic map stringify to the same text.
    KeyCollision { key: String },
    /// A runtime value has no YAML/JSON representation.
    UnsupportedValueType { type_name: &'static str },
    /// A transform processor failed. `document` is the document as the
    /// failing processor left it.
    Processor {
        cause: BoxError,
        document: Box<Document>,
    },
    /// A YAML budget limit was exceeded.
    Budget { breach: BudgetBreach, location: Location },
    /// JSON encoding or decoding failed.
    Json { cause: serde_json::Error },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn structural<S: Into<String>>(msg: S) -> Self {
        Error::Structural {
            msg: msg.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn scan<S: Into<String>>(msg: S) -> Self {
        Error::Scan {
            msg: msg.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn tag<T, V, R>(tag: T, value: V, reason: R) -> Self
    where
        T: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Error::Tag {
            tag: tag.into(),
            value: value.into(),
            reason: reason.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn key_type<S: Into<String>>(found: S) -> Self {
        Error::KeyType {
            found: found.into(),
            location: Location::UNKNOWN,
        }
    }

    /// Attach a concrete location to this error, unless it already has one.
    ///
    /// Errors are created deep in the walk and located by the caller that
    /// knows which node is being processed; the innermost location wins.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::Scan { location, .. }
            | Error::Structural { location, .. }
            | Error::Tag { location, .. }
            | Error::KeyType { location, .. }
            | Error::Budget { location, .. } => {
                if !location.is_known() {
                    *location = set_location;
                }
            }
            Error::KeyCollision { .. }
            | Error::UnsupportedValueType { .. }
            | Error::Processor { .. }
            | Error::Json { .. } => {}
        }
        self
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Scan { location, .. }
            | Error::Structural { location, .. }
            | Error::Tag { location, .. }
            | Error::KeyType { location, .. }
            | Error::Budget { location, .. } => location.is_known().then_some(*location),
            Error::KeyCollision { .. }
            | Error::UnsupportedValueType { .. }
            | Error::Processor { .. }
            | Error::Json { .. } => None,
        }
    }

    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let mark = err.marker();
        Error::Scan {
            msg: err.info().to_owned(),
            location: Location::new(mark.line(), mark.col() + 1),
        }
    }

    pub(crate) fn budget(breach: BudgetBreach) -> Self {
        Error::Budget {
            breach,
            location: Location::UNKNOWN,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Scan { msg, location } => {
                fmt_with_location(f, &format!("invalid YAML: {msg}"), location)
            }
            Error::Structural { msg, location } => fmt_with_location(f, msg, location),
            Error::Tag {
                tag,
                value,
                reason,
                location,
            } => fmt_with_location(
                f,
                &format!("cannot resolve scalar {value:?} tagged {tag}: {reason}"),
                location,
            ),
            Error::KeyType { found, location } => fmt_with_location(
                f,
                &format!("unsupported mapping key type: {found}"),
                location,
            ),
            Error::KeyCollision { key } => {
                write!(f, "map keys collide after conversion to string: {key:?}")
            }
            Error::UnsupportedValueType { type_name } => {
                write!(f, "unsupported value type: {type_name}")
            }
            Error::Processor { cause, .. } => write!(f, "document processor failed: {cause}"),
            Error::Budget { breach, location } => {
                fmt_with_location(f, &format!("YAML budget breached: {breach:?}"), location)
            }
            Error::Json { cause } => write!(f, "JSON error: {cause}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Processor { cause, .. } => Some(cause.as_ref()),
            Error::Json { cause } => Some(cause),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(cause: serde_json::Error) -> Self {
        Error::Json { cause }
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(f, "{msg} at line {}, column {}", location.row, location.column)
    } else {
        write!(f, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_known_location() {
        let err = Error::structural("boom").with_location(Location::new(3, 7));
        assert_eq!(err.to_string(), "boom at line 3, column 7");
        assert_eq!(err.location(), Some(Location::new(3, 7)));
    }

    #[test]
    fn innermost_location_wins() {
        let err = Error::key_type("bool")
            .with_location(Location::new(2, 1))
            .with_location(Location::new(1, 1));
        assert_eq!(err.location().map(|l| l.line()), Some(2));
    }

    #[test]
    fn unlocated_errors_render_plainly() {
        let err = Error::UnsupportedValueType { type_name: "bytes" };
        assert_eq!(err.to_string(), "unsupported value type: bytes");
        assert!(err.location().is_none());
    }
}
