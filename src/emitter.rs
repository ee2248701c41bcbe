//! Block-style YAML emitter for [`Tree`]s.
//!
//! Output uses two-space indentation, `key: value` lines and `- ` items.
//! Empty containers are written as `{}` and `[]`. Aliases are expanded in
//! place, so the output never contains anchors. Scalars are written in a
//! form that resolves back to the same tag when re-parsed.

use std::borrow::Cow;

use ahash::AHashSet;

use crate::error::{Error, Result};
use crate::node::{NodeId, NodeKind, Tree};
use crate::options::Options;
use crate::parse_scalars::{
    implicit_tag, parse_decimal_i64, parse_decimal_u64, parse_strict_bool, parse_yaml12_f64,
};
use crate::ser_quoting::{is_plain_key_safe, is_plain_value_safe, push_quoted};
use crate::tags::ScalarTag;
use crate::zmij_format::float_to_yaml;

const INDENT: usize = 2;

/// Render the document held by `tree` with default [`Options`].
pub fn to_yaml_string(tree: &Tree) -> Result<String> {
    to_yaml_string_with_options(tree, &Options::default())
}

/// Render the document held by `tree`.
pub fn to_yaml_string_with_options(tree: &Tree, options: &Options) -> Result<String> {
    let content = tree
        .document_content()
        .ok_or_else(|| Error::structural("tree root is not a single-child document"))?;
    let mut emitter = Emitter {
        tree,
        out: String::new(),
        max_depth: options.max_depth,
        depth: 0,
        on_path: AHashSet::new(),
    };
    emitter.root(content)?;
    Ok(emitter.out)
}

/// What a node looks like once aliases are followed.
enum Shape<'t> {
    Inline,
    Mapping(&'t [(NodeId, NodeId)]),
    Sequence(&'t [NodeId]),
}

struct Emitter<'t> {
    tree: &'t Tree,
    out: String,
    max_depth: usize,
    depth: usize,
    on_path: AHashSet<NodeId>,
}

impl<'t> Emitter<'t> {
    /// Follow aliases to the node whose content is written.
    fn resolve(&self, id: NodeId) -> Result<NodeId> {
        let target = self
            .tree
            .deref(id, self.max_depth)
            .ok_or_else(|| Error::structural("alias chain too long"))?;
        if self.on_path.contains(&target) {
            return Err(Error::structural(
                "alias refers to an enclosing node (recursive alias)",
            ));
        }
        Ok(target)
    }

    fn shape(&self, id: NodeId) -> Shape<'t> {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::Mapping(pairs) if !pairs.is_empty() => Shape::Mapping(pairs),
            NodeKind::Sequence(items) if !items.is_empty() => Shape::Sequence(items),
            _ => Shape::Inline,
        }
    }

    fn enter(&mut self, id: NodeId) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::structural(format!(
                "nesting deeper than {} levels",
                self.max_depth
            )));
        }
        self.on_path.insert(id);
        Ok(())
    }

    fn leave(&mut self, id: NodeId) {
        self.depth -= 1;
        self.on_path.remove(&id);
    }

    fn root(&mut self, id: NodeId) -> Result<()> {
        let id = self.resolve(id)?;
        match self.shape(id) {
            Shape::Mapping(pairs) => self.mapping(id, pairs, 0, false),
            Shape::Sequence(items) => self.sequence(id, items, 0),
            Shape::Inline => {
                self.inline(id)?;
                self.out.push('\n');
                Ok(())
            }
        }
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }

    /// Write mapping entries at `indent`. When `continued` is set the first
    /// key follows a `- ` already on the current line.
    fn mapping(
        &mut self,
        id: NodeId,
        pairs: &'t [(NodeId, NodeId)],
        indent: usize,
        continued: bool,
    ) -> Result<()> {
        self.enter(id)?;
        for (i, (key, value)) in pairs.iter().enumerate() {
            if !(continued && i == 0) {
                self.pad(indent);
            }
            self.key(*key)?;
            self.out.push(':');
            let value = self.resolve(*value)?;
            match self.shape(value) {
                Shape::Inline => {
                    self.out.push(' ');
                    self.inline(value)?;
                    self.out.push('\n');
                }
                Shape::Mapping(inner) => {
                    self.out.push('\n');
                    self.mapping(value, inner, indent + INDENT, false)?;
                }
                Shape::Sequence(items) => {
                    self.out.push('\n');
                    self.sequence(value, items, indent + INDENT)?;
                }
            }
        }
        self.leave(id);
        Ok(())
    }

    fn sequence(&mut self, id: NodeId, items: &'t [NodeId], indent: usize) -> Result<()> {
        self.enter(id)?;
        for item in items {
            self.pad(indent);
            self.out.push('-');
            let item = self.resolve(*item)?;
            match self.shape(item) {
                Shape::Inline => {
                    self.out.push(' ');
                    self.inline(item)?;
                    self.out.push('\n');
                }
                Shape::Mapping(pairs) => {
                    self.out.push(' ');
                    self.mapping(item, pairs, indent + INDENT, true)?;
                }
                Shape::Sequence(inner) => {
                    self.out.push('\n');
                    self.sequence(item, inner, indent + INDENT)?;
                }
            }
        }
        self.leave(id);
        Ok(())
    }

    fn key(&mut self, id: NodeId) -> Result<()> {
        let id = self.resolve(id)?;
        let tree = self.tree;
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Scalar { tag, value } if tag.is_key_tag() => {
                if is_plain_key_safe(value) {
                    self.out.push_str(value);
                } else {
                    push_quoted(&mut self.out, value);
                }
                Ok(())
            }
            NodeKind::Scalar { tag, .. } => Err(Error::key_type(format!("scalar tagged {tag}"))),
            _ => Err(Error::key_type(node.kind_name())),
        }
    }

    /// Scalars and empty containers.
    fn inline(&mut self, id: NodeId) -> Result<()> {
        let tree = self.tree;
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Mapping(_) => self.out.push_str("{}"),
            NodeKind::Sequence(_) => self.out.push_str("[]"),
            NodeKind::Scalar { tag, value } => self.scalar(tag, value)?,
            NodeKind::Document(_) | NodeKind::Alias(_) => {
                return Err(Error::structural(format!(
                    "unexpected {} node in value position",
                    node.kind_name()
                )));
            }
        }
        Ok(())
    }

    fn scalar(&mut self, tag: &ScalarTag, raw: &str) -> Result<()> {
        match tag {
            ScalarTag::Str => {
                if is_plain_value_safe(raw) {
                    self.out.push_str(raw);
                } else {
                    push_quoted(&mut self.out, raw);
                }
            }
            ScalarTag::Timestamp => {
                if implicit_tag(raw) == ScalarTag::Timestamp {
                    self.out.push_str(raw);
                } else {
                    self.out.push_str("!!timestamp ");
                    push_quoted(&mut self.out, raw);
                }
            }
            _ => {
                let text = canonical_text(tag, raw)?;
                self.out.push_str(&text);
            }
        }
        Ok(())
    }
}

/// Plain text for a non-string scalar that resolves back to `tag`.
///
/// Integers above `i64::MAX` are written in full and read back as `Uint`.
fn canonical_text<'a>(tag: &ScalarTag, raw: &'a str) -> Result<Cow<'a, str>> {
    let invalid = |reason: &str| Error::tag(tag.as_str(), raw, reason);
    Ok(match tag {
        ScalarTag::Null => Cow::Borrowed("null"),
        ScalarTag::Bool => match parse_strict_bool(raw) {
            Some(true) => Cow::Borrowed("true"),
            Some(false) => Cow::Borrowed("false"),
            None => return Err(invalid("expecting bool content")),
        },
        ScalarTag::Int => match parse_decimal_i64(raw) {
            Some(i) => Cow::Owned(i.to_string()),
            None => match parse_decimal_u64(raw) {
                Some(u) => Cow::Owned(u.to_string()),
                None => return Err(invalid("expecting base-10 integer content")),
            },
        },
        ScalarTag::Float => match parse_yaml12_f64(raw) {
            Some(f) => Cow::Owned(float_to_yaml(f)),
            None => return Err(invalid("expecting float content")),
        },
        ScalarTag::Str | ScalarTag::Timestamp => Cow::Borrowed(raw),
        ScalarTag::Other(_) => return Err(invalid("tag is not supported")),
    })
}
