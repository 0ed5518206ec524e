use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::contig::Link;
use crate::core::graph::{Component, ScaffoldGraph};
use crate::core::types::{ContigEnd, Orientation};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{component}: no contig has an outgoing link, cannot choose a start node")]
    NoStartNode { component: String },

    #[error("{component}: {count} contigs not reachable from start node (first: {first})")]
    Unplaced {
        component: String,
        count: usize,
        first: String,
    },
}

/// Global coordinates of one contig; `start > end` means reverse placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    pub start: i64,
    pub end: i64,
}

impl Placement {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn get(&self, end: ContigEnd) -> i64 {
        match end {
            ContigEnd::Start => self.start,
            ContigEnd::End => self.end,
        }
    }

    fn set(&mut self, end: ContigEnd, value: i64) {
        match end {
            ContigEnd::Start => self.start = value,
            ContigEnd::End => self.end = value,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.start < self.end
    }

    pub fn min(&self) -> i64 {
        self.start.min(self.end)
    }

    pub fn max(&self) -> i64 {
        self.start.max(self.end)
    }

    /// Number of bases spanned, `|start - end|`
    pub fn len(&self) -> u64 {
        self.start.abs_diff(self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn shifted(self, offset: i64) -> Self {
        Self::new(self.start - offset, self.end - offset)
    }

    /// Coordinates of a contig of `length` bases joined to this one by `link`.
    ///
    /// With `downstream` set, `self` is the link's source and the result is its
    /// target; otherwise `self` is the target and the result is the source. Both
    /// directions read the same junction ends from the link orientation: the new
    /// contig's junction end sits `gap` bases past the known contig's junction
    /// end, and its body extends `length` bases further in the same direction.
    #[must_use]
    pub fn adjacent(&self, link: &Link, length: i64, downstream: bool) -> Self {
        let (source_end, target_end) = link.orientation.junction_ends();
        let (anchor, attach, sign) = if downstream {
            (source_end, target_end, 1)
        } else {
            (target_end, source_end, -1)
        };

        let junction = self.get(anchor) + sign * link.gap();
        let mut placed = Self::default();
        placed.set(attach, junction);
        placed.set(attach.opposite(), junction + sign * length);
        placed
    }
}

/// Global coordinates of the contigs of one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Contig the layout was anchored at
    pub start_node: NodeIndex,
    placements: BTreeMap<NodeIndex, Placement>,
}

impl Layout {
    pub fn get(&self, node: NodeIndex) -> Option<Placement> {
        self.placements.get(&node).copied()
    }

    /// Placements in node order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Placement)> + '_ {
        self.placements.iter().map(|(&n, &p)| (n, p))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Largest coordinate of any contig
    pub fn max_coord(&self) -> i64 {
        self.placements.values().map(Placement::max).max().unwrap_or(0)
    }

    /// Smallest coordinate of any contig (0 once normalized)
    pub fn min_coord(&self) -> i64 {
        self.placements.values().map(Placement::min).min().unwrap_or(0)
    }

    /// Component contigs that received no coordinates
    pub fn unplaced(&self, component: &Component) -> Vec<NodeIndex> {
        component
            .nodes
            .iter()
            .copied()
            .filter(|n| !self.placements.contains_key(n))
            .collect()
    }

    /// Fail if any contig of the component is missing from the layout
    pub fn check_complete(
        &self,
        graph: &ScaffoldGraph,
        component: &Component,
    ) -> Result<(), LayoutError> {
        let unplaced = self.unplaced(component);
        match unplaced.first() {
            None => Ok(()),
            Some(&first) => Err(LayoutError::Unplaced {
                component: component.name(),
                count: unplaced.len(),
                first: graph.name(first).to_string(),
            }),
        }
    }

    /// Contigs whose placed direction disagrees with their orientation attribute
    pub fn orientation_conflicts(&self, graph: &ScaffoldGraph) -> Vec<NodeIndex> {
        self.iter()
            .filter(|(node, placement)| {
                !placement.is_empty()
                    && placement.is_forward()
                        != (graph.contig(*node).orientation == Orientation::Forward)
            })
            .map(|(node, _)| node)
            .collect()
    }
}

/// Assigns global coordinates to the contigs of a component.
///
/// Coordinates propagate from the start node over the undirected view of the
/// graph, so links are followed both forwards and backwards. When a contig
/// receives several estimates the one with the largest start wins. Each contig
/// is expanded once, so a replaced estimate does not propagate further.
pub struct CoordinateAssigner<'a> {
    graph: &'a ScaffoldGraph,
}

impl<'a> CoordinateAssigner<'a> {
    pub fn new(graph: &'a ScaffoldGraph) -> Self {
        Self { graph }
    }

    pub fn assign(&self, component: &Component, start_node: NodeIndex) -> Layout {
        let graph = self.graph;
        let anchor = graph.contig(start_node);
        let initial = match anchor.orientation {
            Orientation::Forward => Placement::new(0, anchor.span()),
            Orientation::Reverse => Placement::new(0, -anchor.span()),
        };

        let mut placements = BTreeMap::from([(start_node, initial)]);
        let mut visited = BTreeSet::from([start_node]);
        let mut stack = vec![start_node];
        let mut replaced = 0usize;

        while let Some(src) = stack.pop() {
            let Some(known) = placements.get(&src).copied() else {
                continue;
            };
            for n in graph.undirected_neighbors(src) {
                if !component.contains(n) {
                    continue;
                }
                let length = graph.contig(n).span();
                let candidate = if let Some(edge) = graph.find_link(src, n) {
                    known.adjacent(graph.link(edge), length, true)
                } else if let Some(edge) = graph.find_link(n, src) {
                    known.adjacent(graph.link(edge), length, false)
                } else {
                    continue;
                };

                match placements.entry(n) {
                    Entry::Vacant(slot) => {
                        slot.insert(candidate);
                    }
                    Entry::Occupied(mut slot) => {
                        if slot.get().start < candidate.start {
                            slot.insert(candidate);
                            replaced += 1;
                        }
                    }
                }

                if visited.insert(n) {
                    stack.push(n);
                }
            }
        }

        let offset = placements.values().map(Placement::min).min().unwrap_or(0);
        for placement in placements.values_mut() {
            *placement = placement.shifted(offset);
        }

        debug!(
            "{}: placed {}/{} contigs from {} ({} estimates replaced)",
            component.name(),
            placements.len(),
            component.len(),
            graph.name(start_node),
            replaced
        );

        Layout {
            start_node,
            placements,
        }
    }
}
