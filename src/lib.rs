//! Order-preserving YAML ⇄ JSON conversion.
//!
//! YAML is parsed into a typed node [`Tree`], walked into an ordered
//! [`Document`] (entry order and duplicate keys preserved), optionally run
//! through a [`Pipeline`] of processors, and encoded as JSON. The reverse
//! direction rebuilds a tagged tree from a [`Document`], [`Value`] or loosely
//! typed [`Loose`] data and can render it as YAML text.
//!
//! ```rust
//! let doc = mapslice::yaml_to_document(b"paths: {}\ninfo: {title: x}\n").unwrap();
//! assert_eq!(doc.keys().collect::<Vec<_>>(), ["paths", "info"]);
//! assert_eq!(doc.to_json().unwrap(), br#"{"paths":{},"info":{"title":"x"}}"#);
//! ```
#![forbid(unsafe_code)]

pub use budget::{Budget, BudgetBreach, BudgetReport, check_yaml_budget};
pub use convert::{
    is_yaml_path, json_to_document, json_to_yaml, loose_to_json, parse_tree,
    parse_tree_with_options, tree_to_document, tree_to_json, yaml_to_document,
    yaml_to_document_with_options, yaml_to_json, yaml_to_json_with_options,
};
pub use document::{Document, Entry, Value};
pub use emitter::{to_yaml_string, to_yaml_string_with_options};
pub use error::{BoxError, Error, Location, Result};
pub use loose::{Loose, normalize, normalize_with_options};
pub use node::{Node, NodeId, NodeKind, Tree};
pub use options::{AliasLimits, Options};
pub use parse_scalars::resolve_scalar;
pub use pipeline::{Pipeline, Processor};
pub use reverse::{document_to_tree, to_tree, to_tree_with_options, value_to_tree};
pub use tags::ScalarTag;
pub use walker::walk;

pub mod budget;
mod convert;
mod document;
mod emitter;
mod error;
mod loose;
mod macros;
mod node;
mod node_builder;
mod options;
mod parse_scalars;
mod pipeline;
mod reverse;
mod ser_quoting;
mod tags;
mod walker;
mod zmij_format;
