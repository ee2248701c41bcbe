//! Builds a [`Tree`] from the `saphyr_parser::Parser` event stream.
//!
//! - Every raw event passes the optional [`BudgetEnforcer`] before a node is
//!   allocated.
//! - Containers get their node id when they start, so anchors on containers
//!   are registered before their content. An alias inside its own anchored
//!   container therefore points at an ancestor; the walker rejects that.
//! - Untagged plain scalars receive their implicit core-schema tag here.
//! - Only the first document of a stream is read.

use ahash::AHashMap;
use saphyr_parser::{Event, Parser, ScalarStyle};
use smallvec::SmallVec;
use tracing::debug;

use crate::budget::{Budget, BudgetEnforcer};
use crate::error::{Error, Location, Result, location_from_span};
use crate::node::{NodeId, NodeKind, Tree};
use crate::parse_scalars::implicit_tag;
use crate::tags::ScalarTag;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    Document,
    Sequence,
    Mapping,
}

/// A container whose children are still arriving.
struct Frame {
    id: NodeId,
    kind: FrameKind,
    location: Location,
    items: SmallVec<[NodeId; 8]>,
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
}

struct TreeBuilder {
    tree: Tree,
    frames: Vec<Frame>,
    /// Anchor id (as numbered by the parser) -> anchored node.
    anchors: AHashMap<usize, NodeId>,
    has_document: bool,
    budget: Option<BudgetEnforcer>,
}

/// Parse `input` into a tree. Root shape is not checked here.
pub(crate) fn build_tree(input: &str, budget: Option<&Budget>) -> Result<Tree> {
    let mut builder = TreeBuilder {
        tree: Tree::new(),
        frames: Vec::new(),
        anchors: AHashMap::new(),
        has_document: false,
        budget: budget.cloned().map(BudgetEnforcer::new),
    };
    let mut last_location = Location::UNKNOWN;

    let mut parser = Parser::new_from_str(input);
    while let Some(item) = parser.next() {
        let (ev, span) = item.map_err(Error::from_scan_error)?;
        let location = location_from_span(&span);
        last_location = location;

        if let Some(enforcer) = builder.budget.as_mut() {
            enforcer
                .observe(&ev)
                .map_err(|breach| Error::budget(breach).with_location(location))?;
        }

        if builder
            .handle(ev, location)
            .map_err(|err| err.with_location(location))?
            == Flow::Done
        {
            break;
        }
    }

    builder.finish(last_location)
}

impl TreeBuilder {
    fn handle(&mut self, ev: Event<'_>, location: Location) -> Result<Flow> {
        match ev {
            Event::StreamStart | Event::Nothing => {}
            Event::StreamEnd => return Ok(Flow::Done),

            Event::DocumentStart(_) => {
                let id = self.tree.push(NodeKind::Document(Vec::new()), location);
                self.tree.set_root(id);
                self.has_document = true;
                self.open(id, FrameKind::Document, location);
            }
            Event::DocumentEnd => {
                let frame = self.close(FrameKind::Document)?;
                self.tree
                    .set_kind(frame.id, NodeKind::Document(frame.items.into_vec()));
                return Ok(Flow::Done);
            }

            Event::Scalar(value, style, anchor_id, tag) => {
                let tag = match tag {
                    Some(tag) => ScalarTag::from_explicit(&tag.to_string()),
                    None if matches!(style, ScalarStyle::Plain) => implicit_tag(&value),
                    None => ScalarTag::Str,
                };
                let id = self.tree.push(
                    NodeKind::Scalar {
                        tag,
                        value: value.into_owned(),
                    },
                    location,
                );
                self.anchor(anchor_id, id);
                self.add_child(id)?;
            }

            // Container tags (`!!seq`, `!!map`, custom) carry no information
            // for JSON and are ignored.
            Event::SequenceStart(anchor_id, _) => {
                let id = self.tree.push(NodeKind::Sequence(Vec::new()), location);
                self.anchor(anchor_id, id);
                self.add_child(id)?;
                self.open(id, FrameKind::Sequence, location);
            }
            Event::SequenceEnd => {
                let frame = self.close(FrameKind::Sequence)?;
                self.tree
                    .set_kind(frame.id, NodeKind::Sequence(frame.items.into_vec()));
            }

            Event::MappingStart(anchor_id, _) => {
                let id = self.tree.push(NodeKind::Mapping(Vec::new()), location);
                self.anchor(anchor_id, id);
                self.add_child(id)?;
                self.open(id, FrameKind::Mapping, location);
            }
            Event::MappingEnd => {
                let frame = self.close(FrameKind::Mapping)?;
                if frame.items.len() % 2 != 0 {
                    return Err(Error::structural(format!(
                        "mapping has {} nodes; expected key/value pairs",
                        frame.items.len()
                    ))
                    .with_location(frame.location));
                }
                let pairs = frame
                    .items
                    .chunks_exact(2)
                    .map(|pair| (pair[0], pair[1]))
                    .collect();
                self.tree.set_kind(frame.id, NodeKind::Mapping(pairs));
            }

            Event::Alias(anchor_id) => {
                let target = *self.anchors.get(&anchor_id).ok_or_else(|| {
                    Error::structural(format!("alias references unknown anchor id {anchor_id}"))
                })?;
                let id = self.tree.push(NodeKind::Alias(target), location);
                self.add_child(id)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn open(&mut self, id: NodeId, kind: FrameKind, location: Location) {
        self.frames.push(Frame {
            id,
            kind,
            location,
            items: SmallVec::new(),
        });
    }

    fn close(&mut self, expected: FrameKind) -> Result<Frame> {
        match self.frames.pop() {
            Some(frame) if frame.kind == expected => Ok(frame),
            _ => Err(Error::structural(format!(
                "{expected:?} end without a matching start"
            ))),
        }
    }

    fn anchor(&mut self, anchor_id: usize, id: NodeId) {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, id);
        }
    }

    fn add_child(&mut self, id: NodeId) -> Result<()> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.items.push(id);
                Ok(())
            }
            None => Err(Error::structural("node outside of any document")),
        }
    }

    fn finish(self, last_location: Location) -> Result<Tree> {
        if let Some(frame) = self.frames.last() {
            return Err(Error::structural(format!(
                "unexpected end of input inside {:?}",
                frame.kind
            ))
            .with_location(last_location));
        }
        if !self.has_document {
            return Err(Error::structural("no YAML document found"));
        }
        if let Some(enforcer) = self.budget {
            let report = enforcer.finalize();
            debug!(
                events = report.events,
                nodes = report.nodes,
                aliases = report.aliases,
                max_depth = report.max_depth,
                "YAML budget report"
            );
            if let Some(breach) = report.breached {
                return Err(Error::budget(breach).with_location(last_location));
            }
        }
        Ok(self.tree)
    }
}
