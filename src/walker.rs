//! Tree walker: turns a [`Tree`] into [`Value`]s.
//!
//! The walk is recursive but depth-counted, so deep nesting fails with a
//! structural error instead of exhausting the stack. Container nodes on the
//! current path are tracked; an alias that points back at one of them would
//! recurse forever and is rejected. Aliases to finished nodes may be expanded
//! any number of times, within [`AliasLimits`].

use ahash::{AHashMap, AHashSet};
use tracing::trace;

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::node::{NodeId, NodeKind, Tree};
use crate::options::{AliasLimits, Options};
use crate::parse_scalars::resolve_scalar;

/// Walk the subtree rooted at `node`.
pub fn walk(tree: &Tree, node: NodeId, options: &Options) -> Result<Value> {
    Walker::new(tree, options).walk(node)
}

pub(crate) struct Walker<'t> {
    tree: &'t Tree,
    max_depth: usize,
    depth: usize,
    on_path: AHashSet<NodeId>,
    alias_limits: AliasLimits,
    expansions: usize,
    per_anchor: AHashMap<NodeId, usize>,
}

impl<'t> Walker<'t> {
    pub(crate) fn new(tree: &'t Tree, options: &Options) -> Self {
        Self {
            tree,
            max_depth: options.max_depth,
            depth: 0,
            on_path: AHashSet::new(),
            alias_limits: options.alias_limits,
            expansions: 0,
            per_anchor: AHashMap::new(),
        }
    }

    pub(crate) fn walk(&mut self, id: NodeId) -> Result<Value> {
        let node = self.tree.node(id);
        let location = node.location;
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(Error::structural(format!(
                "nesting deeper than {} levels",
                self.max_depth
            ))
            .with_location(location));
        }
        let result = self.dispatch(id);
        self.depth -= 1;
        result.map_err(|err| err.with_location(location))
    }

    fn dispatch(&mut self, id: NodeId) -> Result<Value> {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::Document(children) => match children.as_slice() {
                [only] => self.walk(*only),
                _ => Err(Error::structural(format!(
                    "document must have exactly one root node, found {}",
                    children.len()
                ))),
            },
            NodeKind::Sequence(items) => self.guarded(id, |w| {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(w.walk(*item)?);
                }
                Ok(Value::List(list))
            }),
            NodeKind::Mapping(pairs) => self.guarded(id, |w| {
                let mut doc = Document::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = w.key(*key)?;
                    let value = w.walk(*value)?;
                    doc.push(key, value);
                }
                Ok(Value::Document(doc))
            }),
            NodeKind::Scalar { tag, value } => resolve_scalar(tag, value),
            NodeKind::Alias(target) => self.expand(*target),
        }
    }

    /// Run `f` with `id` marked as being on the current path.
    fn guarded<F>(&mut self, id: NodeId, f: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        self.on_path.insert(id);
        let result = f(self);
        self.on_path.remove(&id);
        result
    }

    fn expand(&mut self, target: NodeId) -> Result<Value> {
        if self.on_path.contains(&target) {
            return Err(Error::structural(
                "alias refers to an enclosing node (recursive alias)",
            ));
        }
        self.count_expansion(target)?;
        trace!(target = target.index(), "expanding alias");
        self.walk(target)
    }

    /// Charge one alias expansion of `target` against [`AliasLimits`].
    fn count_expansion(&mut self, target: NodeId) -> Result<()> {
        self.expansions += 1;
        if self.expansions > self.alias_limits.max_total_expansions {
            return Err(Error::structural(format!(
                "alias expansion limit exceeded: {} > {}",
                self.expansions, self.alias_limits.max_total_expansions
            )));
        }
        let count = self.per_anchor.entry(target).or_insert(0);
        *count += 1;
        if *count > self.alias_limits.max_expansions_per_anchor {
            return Err(Error::structural(format!(
                "alias expansion limit exceeded for one anchor: {} > {}",
                count, self.alias_limits.max_expansions_per_anchor
            )));
        }
        Ok(())
    }

    /// Resolve a mapping key to its entry key text.
    ///
    /// The key is resolved under its tag (so `!!int x` still fails) and the
    /// raw text is kept: `1.50` stays `"1.50"`. Aliased keys count against
    /// the same limits as aliased values.
    fn key(&mut self, id: NodeId) -> Result<String> {
        let tree = self.tree;
        let location = tree.node(id).location;
        let mut resolved = id;
        let mut hops = 0;
        while let NodeKind::Alias(target) = tree.node(resolved).kind {
            hops += 1;
            if hops > self.max_depth {
                return Err(Error::structural("alias chain too long for a mapping key")
                    .with_location(location));
            }
            self.count_expansion(target)
                .map_err(|err| err.with_location(location))?;
            resolved = target;
        }
        let node = tree.node(resolved);
        match &node.kind {
            NodeKind::Scalar { tag, value } if tag.is_key_tag() => {
                resolve_scalar(tag, value).map_err(|err| err.with_location(location))?;
                Ok(value.clone())
            }
            NodeKind::Scalar { tag, .. } => {
                Err(Error::key_type(format!("scalar tagged {tag}")).with_location(location))
            }
            _ => Err(Error::key_type(node.kind_name()).with_location(location)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_builder::build_tree;

    fn walk_str(input: &str, options: &Options) -> Result<Value> {
        let tree = build_tree(input, None)?;
        walk(&tree, tree.root(), options)
    }

    #[test]
    fn repeated_aliases_are_expanded() {
        let value = walk_str("a: &x {k: 1}\nb: *x\nc: *x\n", &Options::default()).unwrap();
        let doc = value.as_document().unwrap();
        assert_eq!(doc.get("b"), doc.get("a"));
        assert_eq!(doc.get("c"), doc.get("a"));
    }

    #[test]
    fn alias_to_enclosing_node_is_a_cycle() {
        let err = walk_str("a: &x\n  b: *x\n", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }), "{err:?}");
        assert!(err.to_string().contains("recursive alias"));
    }

    #[test]
    fn depth_limit_applies() {
        let options = crate::options! { max_depth: 3 };
        assert!(walk_str("a: [[[[1]]]]\n", &options).is_err());
        assert!(walk_str("a: 1\n", &options).is_ok());
    }

    #[test]
    fn per_anchor_expansions_are_limited() {
        let options = crate::options! {
            alias_limits: AliasLimits {
                max_total_expansions: 100,
                max_expansions_per_anchor: 1,
            },
        };
        assert!(walk_str("a: &x 1\nb: *x\n", &options).is_ok());
        assert!(walk_str("a: &x 1\nb: *x\nc: *x\n", &options).is_err());
    }

    #[test]
    fn aliased_keys_count_against_limits() {
        let options = crate::options! {
            alias_limits: AliasLimits {
                max_total_expansions: 100,
                max_expansions_per_anchor: 1,
            },
        };
        let value = walk_str("a: &k name
*k : 1
", &options).unwrap();
        let keys: Vec<_> = value.as_document().unwrap().keys().map(str::to_owned).collect();
        assert_eq!(keys, ["a", "name"]);

        let err = walk_str("a: &k name
*k : 1
b: *k
", &options).unwrap_err();
        assert!(err.to_string().contains("for one anchor"), "{err}");

        let options = crate::options! {
            alias_limits: AliasLimits {
                max_total_expansions: 1,
                max_expansions_per_anchor: 100,
            },
        };
        let err = walk_str("a: &k x
*k : 1
b: *k
", &options).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }), "{err:?}");
    }

    #[test]
    fn keys_keep_raw_text_and_reject_other_tags() {
        let value = walk_str("1.50: a\n007: b\n", &Options::default()).unwrap();
        let keys: Vec<_> = value.as_document().unwrap().keys().map(str::to_owned).collect();
        assert_eq!(keys, ["1.50", "007"]);

        let err = walk_str("true: a\n", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::KeyType { .. }), "{err:?}");
        let err = walk_str("[1]: a\n", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::KeyType { .. }), "{err:?}");
    }

    #[test]
    fn tag_errors_carry_the_scalar_location() {
        let err = walk_str("a: 1\nb: !!int x\n", &Options::default()).unwrap_err();
        let location = err.location().unwrap();
        assert_eq!(location.line(), 2);
    }
}
