//! Streaming YAML budget checker over saphyr-parser events.
//!
//! The tree builder feeds every raw parser event through a [`BudgetEnforcer`]
//! before it allocates a node, so pathological inputs are rejected before
//! they turn into large trees.

use std::borrow::Cow;

use ahash::AHashSet;
use saphyr_parser::{Event, Parser, ScanError};
use serde::{Deserialize, Serialize};

/// Budgets for a streaming YAML scan.
///
/// The defaults are permissive for typical configuration and API description
/// files while stopping obvious resource-amplifying inputs.
///
/// ```rust
/// let options = mapslice::options! {
///     budget: Some(mapslice::budget! {
///         max_depth: 64,
///     }),
/// };
///
/// let json = mapslice::yaml_to_json_with_options(b"a: [1, 2]\n", &options, &Default::default()).unwrap();
/// assert_eq!(json, br#"{"a":[1,2]}"#);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum total parser events. Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of alias (`*ref`) events. Default: 50,000
    pub max_aliases: usize,
    /// Maximum number of distinct `&anchor` definitions. Default: 50,000
    pub max_anchors: usize,
    /// Maximum structural nesting depth (sequences + mappings). Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream. Default: 1,024
    pub max_documents: usize,
    /// Maximum number of nodes (sequence starts, mapping starts, scalars). Default: 250,000
    pub max_nodes: usize,
    /// Maximum total bytes of scalar contents. Default: 64 MiB
    pub max_total_scalar_bytes: usize,
    /// Flag inputs that use many more aliases than anchors. Default: true
    pub enforce_alias_anchor_ratio: bool,
    /// Aliases needed before the ratio heuristic is evaluated. Default: 100
    pub alias_anchor_min_aliases: usize,
    /// Breach when `aliases > multiplier * anchors`. Default: 10
    pub alias_anchor_ratio_multiplier: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000,
            max_aliases: 50_000,
            max_anchors: 50_000,
            max_depth: 2_000,
            max_documents: 1_024,
            max_nodes: 250_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
            enforce_alias_anchor_ratio: true,
            alias_anchor_min_aliases: 100,
            alias_anchor_ratio_multiplier: 10,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BudgetBreach {
    Events { events: usize },
    Aliases { aliases: usize },
    Anchors { anchors: usize },
    Depth { depth: usize },
    Documents { documents: usize },
    Nodes { nodes: usize },
    ScalarBytes { total_scalar_bytes: usize },
    AliasAnchorRatio { aliases: usize, anchors: usize },
    /// A container end without a matching start.
    Unbalanced,
}

/// Summary of the scan (even if no breach).
#[derive(Clone, Debug, Default)]
pub struct BudgetReport {
    pub breached: Option<BudgetBreach>,
    pub events: usize,
    pub aliases: usize,
    pub anchors: usize,
    pub documents: usize,
    pub nodes: usize,
    pub max_depth: usize,
    pub total_scalar_bytes: usize,
}

/// Stateful helper that enforces a [`Budget`] while consuming a stream of [`Event`]s.
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    depth: usize,
    defined_anchors: AHashSet<usize>,
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            depth: 0,
            defined_anchors: AHashSet::with_capacity(64),
        }
    }

    /// Observe a parser [`Event`]; fails as soon as a limit is exceeded.
    pub fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        self.report.events += 1;
        if self.report.events > self.budget.max_events {
            return Err(BudgetBreach::Events {
                events: self.report.events,
            });
        }

        match ev {
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd | Event::Nothing => {}
            Event::DocumentStart(_) => {
                self.report.documents += 1;
                if self.report.documents > self.budget.max_documents {
                    return Err(BudgetBreach::Documents {
                        documents: self.report.documents,
                    });
                }
            }
            Event::Alias(_) => {
                self.report.aliases += 1;
                if self.report.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::Aliases {
                        aliases: self.report.aliases,
                    });
                }
            }
            Event::Scalar(value, _, anchor_id, _) => {
                self.bump_nodes()?;
                let len = match value {
                    Cow::Borrowed(s) => s.len(),
                    Cow::Owned(s) => s.len(),
                };
                self.report.total_scalar_bytes = self.report.total_scalar_bytes.saturating_add(len);
                if self.report.total_scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::ScalarBytes {
                        total_scalar_bytes: self.report.total_scalar_bytes,
                    });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceStart(anchor_id, _) | Event::MappingStart(anchor_id, _) => {
                self.bump_nodes()?;
                self.depth += 1;
                self.report.max_depth = self.report.max_depth.max(self.depth);
                if self.depth > self.budget.max_depth {
                    return Err(BudgetBreach::Depth { depth: self.depth });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.depth = self.depth.checked_sub(1).ok_or(BudgetBreach::Unbalanced)?;
            }
        }
        Ok(())
    }

    fn bump_nodes(&mut self) -> Result<(), BudgetBreach> {
        self.report.nodes += 1;
        if self.report.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::Nodes {
                nodes: self.report.nodes,
            });
        }
        Ok(())
    }

    fn record_anchor(&mut self, anchor_id: usize) -> Result<(), BudgetBreach> {
        if anchor_id != 0 && self.defined_anchors.insert(anchor_id) {
            let count = self.defined_anchors.len();
            if count > self.budget.max_anchors {
                self.report.anchors = count;
                return Err(BudgetBreach::Anchors { anchors: count });
            }
        }
        self.report.anchors = self.defined_anchors.len();
        Ok(())
    }

    /// Consume the enforcer after a breach was detected.
    pub fn into_report(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();
        self.report
    }

    /// Finish the scan, applying the alias/anchor ratio heuristic.
    pub fn finalize(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();
        let r = &mut self.report;
        if self.budget.enforce_alias_anchor_ratio
            && r.aliases >= self.budget.alias_anchor_min_aliases
            && (r.anchors == 0 || r.aliases > self.budget.alias_anchor_ratio_multiplier * r.anchors)
        {
            r.breached = Some(BudgetBreach::AliasAnchorRatio {
                aliases: r.aliases,
                anchors: r.anchors,
            });
        }
        self.report
    }
}

/// Check `input` against `budget` without building a tree.
///
/// `report.breached.is_none()` means the input is within budget.
pub fn check_yaml_budget(input: &str, budget: &Budget) -> Result<BudgetReport, ScanError> {
    let mut parser = Parser::new_from_str(input);
    let mut enforcer = BudgetEnforcer::new(budget.clone());

    while let Some(item) = parser.next() {
        let (ev, _span) = item?;
        if let Err(breach) = enforcer.observe(&ev) {
            let mut report = enforcer.into_report();
            report.breached = Some(breach);
            return Ok(report);
        }
    }

    Ok(enforcer.finalize())
}
