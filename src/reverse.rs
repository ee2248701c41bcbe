//! Reverse converter: rebuilds a YAML [`Tree`] from in-memory values.
//!
//! Every scalar gets an explicit tag derived from its runtime variant, so the
//! tree carries the same type information the forward walk would have
//! resolved. Synthesized nodes have [`Location::UNKNOWN`].

use ahash::AHashSet;

use crate::document::{Document, Value};
use crate::error::{Error, Location, Result};
use crate::loose::Loose;
use crate::node::{NodeId, NodeKind, Tree};
use crate::options::Options;
use crate::tags::ScalarTag;
use crate::zmij_format::float_to_yaml;

/// Build a tree from loose data with default [`Options`].
pub fn to_tree(input: &Loose) -> Result<Tree> {
    to_tree_with_options(input, &Options::default())
}

/// Build a tree from loose data.
///
/// Generic maps ([`Loose::Map`]) have no meaningful order, so their keys are
/// sorted lexicographically after conversion to strings. Keys that collide
/// after conversion fail with [`Error::KeyCollision`].
pub fn to_tree_with_options(input: &Loose, options: &Options) -> Result<Tree> {
    let mut builder = ReverseBuilder::new(options);
    let content = builder.loose(input, 0)?;
    Ok(builder.finish(content))
}

/// Build a tree whose root mapping holds the entries of `doc` in stored order.
pub fn document_to_tree(doc: &Document) -> Result<Tree> {
    let mut builder = ReverseBuilder::new(&Options::default());
    let content = builder.document(doc, 0)?;
    Ok(builder.finish(content))
}

/// Build a tree from a single [`Value`].
pub fn value_to_tree(value: &Value) -> Result<Tree> {
    let mut builder = ReverseBuilder::new(&Options::default());
    let content = builder.value(value, 0)?;
    Ok(builder.finish(content))
}

struct ReverseBuilder {
    tree: Tree,
    max_depth: usize,
}

impl ReverseBuilder {
    fn new(options: &Options) -> Self {
        Self {
            tree: Tree::new(),
            max_depth: options.max_depth,
        }
    }

    fn finish(mut self, content: NodeId) -> Tree {
        let root = self.push(NodeKind::Document(vec![content]));
        self.tree.set_root(root);
        self.tree
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.tree.push(kind, Location::UNKNOWN)
    }

    fn scalar(&mut self, tag: ScalarTag, value: String) -> NodeId {
        self.push(NodeKind::Scalar { tag, value })
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::structural(format!(
                "nesting deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn null(&mut self) -> NodeId {
        self.scalar(ScalarTag::Null, "null".to_owned())
    }

    fn bool(&mut self, b: bool) -> NodeId {
        self.scalar(ScalarTag::Bool, b.to_string())
    }

    fn float(&mut self, f: f64) -> NodeId {
        self.scalar(ScalarTag::Float, float_to_yaml(f))
    }

    fn document(&mut self, doc: &Document, depth: usize) -> Result<NodeId> {
        self.check_depth(depth)?;
        let mut pairs = Vec::with_capacity(doc.len());
        for entry in doc {
            let key = self.scalar(ScalarTag::Str, entry.key.clone());
            let value = self.value(&entry.value, depth + 1)?;
            pairs.push((key, value));
        }
        Ok(self.push(NodeKind::Mapping(pairs)))
    }

    fn value(&mut self, value: &Value, depth: usize) -> Result<NodeId> {
        self.check_depth(depth)?;
        Ok(match value {
            Value::Null => self.null(),
            Value::Bool(b) => self.bool(*b),
            Value::Int(i) => self.scalar(ScalarTag::Int, i.to_string()),
            Value::Uint(u) => self.scalar(ScalarTag::Int, u.to_string()),
            Value::Float(f) => self.float(*f),
            Value::String(s) => self.scalar(ScalarTag::Str, s.clone()),
            Value::List(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    children.push(self.value(item, depth + 1)?);
                }
                self.push(NodeKind::Sequence(children))
            }
            Value::Document(doc) => self.document(doc, depth)?,
        })
    }

    fn loose(&mut self, value: &Loose, depth: usize) -> Result<NodeId> {
        self.check_depth(depth)?;
        Ok(match value {
            Loose::Null => self.null(),
            Loose::Bool(b) => self.bool(*b),
            Loose::Int(i) => self.scalar(ScalarTag::Int, i.to_string()),
            Loose::Uint(u) => self.scalar(ScalarTag::Int, u.to_string()),
            Loose::Float(f) => self.float(*f),
            Loose::String(s) => self.scalar(ScalarTag::Str, s.clone()),
            Loose::Bytes(_) => {
                return Err(Error::UnsupportedValueType {
                    type_name: value.type_name(),
                });
            }
            Loose::Seq(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    children.push(self.loose(item, depth + 1)?);
                }
                self.push(NodeKind::Sequence(children))
            }
            Loose::Map(entries) => {
                let mut keyed = Vec::with_capacity(entries.len());
                let mut seen = AHashSet::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = key.key_string()?;
                    if !seen.insert(key.clone()) {
                        return Err(Error::KeyCollision { key });
                    }
                    keyed.push((key, value));
                }
                keyed.sort_by(|a, b| a.0.cmp(&b.0));

                let mut pairs = Vec::with_capacity(keyed.len());
                for (key, value) in keyed {
                    let key = self.scalar(ScalarTag::Str, key);
                    let value = self.loose(value, depth + 1)?;
                    pairs.push((key, value));
                }
                self.push(NodeKind::Mapping(pairs))
            }
            Loose::Ordered(doc) => self.document(doc, depth)?,
        })
    }
}
