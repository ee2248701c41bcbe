//! YAML node tree.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. An alias is just the id of the anchored node it points at, so
//! the tree never owns a node twice and cyclic alias graphs are representable
//! (and rejected later by the walker).

use crate::error::Location;
use crate::tags::ScalarTag;

/// Index of a node inside its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A document; well-formed documents have exactly one child.
    Document(Vec<NodeId>),
    Sequence(Vec<NodeId>),
    /// Key/value pairs in document order.
    Mapping(Vec<(NodeId, NodeId)>),
    Scalar { tag: ScalarTag, value: String },
    /// Back-reference to an anchored node.
    Alias(NodeId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Document(_) => "document",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
            NodeKind::Scalar { .. } => "scalar",
            NodeKind::Alias(_) => "alias",
        }
    }
}

/// A parsed (or reconstructed) YAML tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn push(&mut self, kind: NodeKind, location: Location) -> NodeId {
        self.nodes.push(Node { kind, location });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Panics if `id` is out of range for this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow aliases until a non-alias node is reached, giving up after
    /// `limit` hops.
    pub(crate) fn deref(&self, mut id: NodeId, limit: usize) -> Option<NodeId> {
        for _ in 0..=limit {
            match self.node(id).kind {
                NodeKind::Alias(target) => id = target,
                _ => return Some(id),
            }
        }
        None
    }

    /// The single child of the root document, if the tree has that shape.
    pub fn document_content(&self) -> Option<NodeId> {
        match &self.get(self.root)?.kind {
            NodeKind::Document(children) if children.len() == 1 => Some(children[0]),
            _ => None,
        }
    }
}
