//! Loosely typed values and the key normalizer.
//!
//! [`Loose`] models data produced by generic decoders: maps may have integer
//! (or worse) keys and their iteration order carries no meaning. [`normalize`]
//! turns such data into a [`Value`] whose maps are [`Document`]s with string
//! keys, ready for JSON encoding.

use ahash::AHashSet;

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::options::Options;

/// A loosely typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Loose {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    /// Binary data. It has no JSON or YAML form in this crate and is rejected.
    Bytes(Vec<u8>),
    Seq(Vec<Loose>),
    /// A generic keyed map; any value may appear as a key.
    Map(Vec<(Loose, Loose)>),
    /// An already ordered document, passed through untouched.
    Ordered(Document),
}

impl Loose {
    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Loose::Null => "null",
            Loose::Bool(_) => "bool",
            Loose::Int(_) => "int",
            Loose::Uint(_) => "uint",
            Loose::Float(_) => "float",
            Loose::String(_) => "string",
            Loose::Bytes(_) => "bytes",
            Loose::Seq(_) => "sequence",
            Loose::Map(_) => "map",
            Loose::Ordered(_) => "document",
        }
    }

    /// String form of a map key, if this variant may be used as one.
    ///
    /// Strings are taken as-is and integers of any width in base 10.
    pub(crate) fn key_string(&self) -> Result<String> {
        match self {
            Loose::String(s) => Ok(s.clone()),
            Loose::Int(i) => Ok(i.to_string()),
            Loose::Uint(u) => Ok(u.to_string()),
            other => Err(Error::key_type(other.type_name())),
        }
    }
}

macro_rules! loose_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Loose {
                fn from(v: $ty) -> Self {
                    Loose::$variant(v.into())
                }
            }
        )*
    };
}

loose_from! {
    bool => Bool,
    i8 => Int, i16 => Int, i32 => Int, i64 => Int,
    u8 => Uint, u16 => Uint, u32 => Uint, u64 => Uint,
    f32 => Float, f64 => Float,
    String => String, &str => String,
    Vec<u8> => Bytes,
    Vec<Loose> => Seq,
    Document => Ordered,
}

impl From<isize> for Loose {
    fn from(v: isize) -> Self {
        Loose::Int(v as i64)
    }
}

impl From<usize> for Loose {
    fn from(v: usize) -> Self {
        Loose::Uint(v as u64)
    }
}

impl From<()> for Loose {
    fn from(_: ()) -> Self {
        Loose::Null
    }
}

impl<K: Into<Loose>, V: Into<Loose>> FromIterator<(K, V)> for Loose {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Loose::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Normalize with default [`Options`].
pub fn normalize(input: Loose) -> Result<Value> {
    normalize_with_options(input, &Options::default())
}

/// Convert loose data into a [`Value`].
///
/// Generic maps become [`Document`]s in their iteration order. Two keys that
/// stringify to the same text (`7` and `"7"`) are a [`Error::KeyCollision`].
pub fn normalize_with_options(input: Loose, options: &Options) -> Result<Value> {
    normalize_at(input, options.max_depth, 0)
}

fn normalize_at(input: Loose, max_depth: usize, depth: usize) -> Result<Value> {
    if depth > max_depth {
        return Err(Error::structural(format!(
            "nesting deeper than {max_depth} levels"
        )));
    }
    Ok(match input {
        Loose::Null => Value::Null,
        Loose::Bool(b) => Value::Bool(b),
        Loose::Int(i) => Value::Int(i),
        Loose::Uint(u) => Value::Uint(u),
        Loose::Float(f) => Value::Float(f),
        Loose::String(s) => Value::String(s),
        Loose::Bytes(_) => return Err(Error::UnsupportedValueType { type_name: "bytes" }),
        Loose::Seq(items) => Value::List(
            items
                .into_iter()
                .map(|item| normalize_at(item, max_depth, depth + 1))
                .collect::<Result<_>>()?,
        ),
        Loose::Map(pairs) => {
            let mut seen = AHashSet::with_capacity(pairs.len());
            let mut doc = Document::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = key.key_string()?;
                if !seen.insert(key.clone()) {
                    return Err(Error::KeyCollision { key });
                }
                doc.push(key, normalize_at(value, max_depth, depth + 1)?);
            }
            Value::Document(doc)
        }
        Loose::Ordered(doc) => Value::Document(doc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_keys_become_decimal_strings() {
        let input: Loose = [
            (Loose::from(1u8), Loose::from("one")),
            (Loose::from(-2i32), Loose::from(true)),
        ]
        .into_iter()
        .collect();
        let Value::Document(doc) = normalize(input).unwrap() else {
            panic!("expected a document");
        };
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["1", "-2"]);
        assert_eq!(doc.get("-2"), Some(&Value::Bool(true)));
    }

    #[test]
    fn nested_maps_and_lists_are_normalized() {
        let inner: Loose = [(7i64, "x")].into_iter().collect();
        let input: Loose = [("list", Loose::Seq(vec![inner, Loose::Null]))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&normalize(input).unwrap()).unwrap();
        assert_eq!(json, r#"{"list":[{"7":"x"},null]}"#);
    }

    #[test]
    fn colliding_keys_are_rejected() {
        let input = Loose::Map(vec![
            (Loose::Int(7), Loose::Null),
            (Loose::from("7"), Loose::Null),
        ]);
        assert!(matches!(normalize(input), Err(Error::KeyCollision { key }) if key == "7"));
    }

    #[test]
    fn non_scalar_keys_are_rejected() {
        let input = Loose::Map(vec![(Loose::Bool(true), Loose::Null)]);
        assert!(matches!(normalize(input), Err(Error::KeyType { found, .. }) if found == "bool"));
    }

    #[test]
    fn bytes_are_unsupported() {
        let input = Loose::Seq(vec![Loose::Bytes(vec![0xff])]);
        assert!(matches!(
            normalize(input),
            Err(Error::UnsupportedValueType { type_name: "bytes" })
        ));
    }

    #[test]
    fn ordered_documents_pass_through() {
        let doc: Document = [("b", 1), ("a", 2)].into_iter().collect();
        assert_eq!(normalize(Loose::Ordered(doc.clone())).unwrap(), Value::Document(doc));
    }

    #[test]
    fn depth_is_limited() {
        let mut value = Loose::Null;
        for _ in 0..10 {
            value = Loose::Seq(vec![value]);
        }
        let options = crate::options! { max_depth: 5 };
        assert!(matches!(
            normalize_with_options(value, &options),
            Err(Error::Structural { .. })
        ));
    }
}
