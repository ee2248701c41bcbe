//! Forward conversion (YAML to [`Document`] and JSON) and the JSON/loose
//! entry points built on top of it.

use std::path::Path;

use tracing::debug;

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::loose::{Loose, normalize};
use crate::node::{NodeKind, Tree};
use crate::node_builder::build_tree;
use crate::options::Options;
use crate::pipeline::Pipeline;
use crate::reverse::document_to_tree;
use crate::walker::Walker;

/// Parse YAML bytes into a [`Tree`] with default [`Options`].
pub fn parse_tree(input: &[u8]) -> Result<Tree> {
    parse_tree_with_options(input, &Options::default())
}

/// Parse YAML bytes into a [`Tree`].
///
/// Only the first document of the stream is read, and it must be a mapping;
/// any other root is a structural error.
pub fn parse_tree_with_options(input: &[u8], options: &Options) -> Result<Tree> {
    let text = std::str::from_utf8(input)
        .map_err(|err| Error::scan(format!("input is not valid UTF-8: {err}")))?;
    let tree = build_tree(text, options.budget.as_ref())?;
    check_root(&tree)?;
    debug!(bytes = input.len(), nodes = tree.len(), "parsed YAML tree");
    Ok(tree)
}

fn check_root(tree: &Tree) -> Result<()> {
    let root = tree.node(tree.root());
    let content = match &root.kind {
        NodeKind::Document(children) if children.len() == 1 => tree.node(children[0]),
        _ => {
            return Err(Error::structural(
                "only YAML documents that are objects are supported",
            )
            .with_location(root.location));
        }
    };
    match content.kind {
        NodeKind::Mapping(_) => Ok(()),
        _ => Err(Error::structural(format!(
            "only YAML documents that are objects are supported, found {}",
            content.kind_name()
        ))
        .with_location(content.location)),
    }
}

/// Walk a parsed tree into a [`Document`].
pub fn tree_to_document(tree: &Tree, options: &Options) -> Result<Document> {
    check_root(tree)?;
    match Walker::new(tree, options).walk(tree.root())? {
        Value::Document(doc) => Ok(doc),
        other => Err(Error::structural(format!(
            "document root resolved to {}",
            other.type_name()
        ))),
    }
}

/// Encode a parsed tree as JSON.
pub fn tree_to_json(tree: &Tree) -> Result<Vec<u8>> {
    tree_to_document(tree, &Options::default())?.to_json()
}

pub fn yaml_to_document(input: &[u8]) -> Result<Document> {
    yaml_to_document_with_options(input, &Options::default())
}

/// Parse YAML bytes into an ordered [`Document`].
pub fn yaml_to_document_with_options(input: &[u8], options: &Options) -> Result<Document> {
    let tree = parse_tree_with_options(input, options)?;
    let doc = tree_to_document(&tree, options)?;
    debug!(entries = doc.len(), "converted YAML document");
    Ok(doc)
}

/// Convert YAML bytes to JSON bytes, keeping the source key order.
///
/// ```rust
/// let json = mapslice::yaml_to_json(b"b: 1\na: [true, ~]\n").unwrap();
/// assert_eq!(json, br#"{"b":1,"a":[true,null]}"#);
/// ```
pub fn yaml_to_json(input: &[u8]) -> Result<Vec<u8>> {
    yaml_to_json_with_options(input, &Options::default(), &Pipeline::default())
}

/// Convert YAML bytes to JSON bytes, running `pipeline` on the document
/// before it is encoded.
pub fn yaml_to_json_with_options(
    input: &[u8],
    options: &Options,
    pipeline: &Pipeline,
) -> Result<Vec<u8>> {
    let mut doc = yaml_to_document_with_options(input, options)?;
    if pipeline.has_transforms() {
        doc = pipeline.apply(doc)?;
    }
    let json = doc.to_json()?;
    debug!(bytes = json.len(), "encoded JSON");
    Ok(json)
}

/// Decode a JSON object into a [`Document`], keeping entry order.
pub fn json_to_document(input: &[u8]) -> Result<Document> {
    Document::from_json(input)
}

/// Convert a JSON object to block-style YAML text.
pub fn json_to_yaml(input: &[u8]) -> Result<String> {
    let doc = json_to_document(input)?;
    let tree = document_to_tree(&doc)?;
    crate::emitter::to_yaml_string(&tree)
}

/// Normalize loose data and encode it as JSON.
///
/// Map keys must be strings or integers; see [`normalize`].
pub fn loose_to_json(input: Loose) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&normalize(input)?)?)
}

/// True if `path` has a `.yaml` or `.yml` extension.
pub fn is_yaml_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}
