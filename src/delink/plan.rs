use std::collections::{BTreeMap, BTreeSet};

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::graph::ScaffoldGraph;
use crate::core::types::ContigEnd;
use crate::layout::coordinates::Layout;
use crate::layout::positions::PositionIndex;

/// Default maximum distance in bases between an outlier and a contig boundary
pub const DEFAULT_POS_CUTOFF: u64 = 100;

/// Which links of a contig a boundary hit removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSide {
    Predecessors,
    Successors,
}

impl LinkSide {
    /// Delinking rule for a contig placed `forward` whose `boundary` was hit
    pub fn for_hit(forward: bool, boundary: ContigEnd) -> Self {
        match (forward, boundary) {
            (true, ContigEnd::Start) | (false, ContigEnd::End) => Self::Predecessors,
            (true, ContigEnd::End) | (false, ContigEnd::Start) => Self::Successors,
        }
    }
}

/// The contig boundary closest to an outlier position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryHit {
    pub contig: NodeIndex,
    pub position: i64,
    pub distance: u64,
    pub forward: bool,
    pub boundary: ContigEnd,
}

impl BoundaryHit {
    pub fn side(&self) -> LinkSide {
        LinkSide::for_hit(self.forward, self.boundary)
    }
}

/// Links selected for removal, computed without touching the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelinkPlan {
    /// Deciding hit per contig; a later outlier on the same contig replaces an earlier one
    pub hits: BTreeMap<NodeIndex, BoundaryHit>,

    pub links: BTreeSet<EdgeIndex>,

    /// Outlier positions no contig covers
    pub unregistered: Vec<i64>,

    /// Outlier positions further than the cutoff from every boundary
    pub interior: Vec<i64>,
}

impl DelinkPlan {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Merge the plan of another component
    pub fn extend(&mut self, other: DelinkPlan) {
        self.hits.extend(other.hits);
        self.links.extend(other.links);
        self.unregistered.extend(other.unregistered);
        self.interior.extend(other.interior);
    }

    /// Copy of `graph` with the planned links removed
    #[must_use]
    pub fn apply(&self, graph: &ScaffoldGraph) -> ScaffoldGraph {
        graph.without_links(&self.links)
    }

    /// `(source, target)` names of the planned links
    pub fn link_names(&self, graph: &ScaffoldGraph) -> Vec<(String, String)> {
        self.links
            .iter()
            .filter_map(|&edge| graph.endpoints(edge))
            .map(|(a, b)| (graph.name(a).to_string(), graph.name(b).to_string()))
            .collect()
    }
}

/// Maps outlier positions to contig boundaries and plans link removals
#[derive(Debug, Clone, Copy)]
pub struct Delinker {
    pos_cutoff: u64,
}

impl Default for Delinker {
    fn default() -> Self {
        Self::new(DEFAULT_POS_CUTOFF)
    }
}

impl Delinker {
    pub fn new(pos_cutoff: u64) -> Self {
        Self { pos_cutoff }
    }

    /// Boundary closest to `position` among the contigs covering it.
    ///
    /// Ties keep the first candidate in node order, start before end. Returns
    /// `None` if no contig covers the position.
    pub fn closest_boundary(
        &self,
        layout: &Layout,
        index: &PositionIndex,
        position: i64,
    ) -> Option<BoundaryHit> {
        let mut best: Option<BoundaryHit> = None;
        for contig in index.contigs_at(position)? {
            let Some(placement) = layout.get(contig) else {
                continue;
            };
            let forward = placement.start <= placement.end;
            for boundary in [ContigEnd::Start, ContigEnd::End] {
                let distance = placement.get(boundary).abs_diff(position);
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(BoundaryHit {
                        contig,
                        position,
                        distance,
                        forward,
                        boundary,
                    });
                }
            }
        }
        best
    }

    /// Plan link removals for the outliers of one scaffold
    pub fn plan(
        &self,
        graph: &ScaffoldGraph,
        layout: &Layout,
        index: &PositionIndex,
        outliers: &[usize],
    ) -> DelinkPlan {
        let mut plan = DelinkPlan::default();

        for &outlier in outliers {
            let position = i64::try_from(outlier).unwrap_or(i64::MAX);
            let Some(hit) = self.closest_boundary(layout, index, position) else {
                warn!(
                    "Outlier at {} is not covered by any contig (last position {})",
                    position,
                    index.max_position().unwrap_or(-1)
                );
                plan.unregistered.push(position);
                continue;
            };
            if hit.distance > self.pos_cutoff {
                plan.interior.push(position);
                continue;
            }
            plan.hits.insert(hit.contig, hit);
        }

        for (&contig, hit) in &plan.hits {
            let links = match hit.side() {
                LinkSide::Predecessors => graph.incoming_links(contig),
                LinkSide::Successors => graph.outgoing_links(contig),
            };
            debug!(
                "{}: {:?} boundary hit at {} ({} bp), removing {} {:?}",
                graph.name(contig),
                hit.boundary,
                hit.position,
                hit.distance,
                links.len(),
                hit.side()
            );
            plan.links.extend(links);
        }

        plan
    }

    /// Plan and apply in one step, returning the edited copy
    pub fn delink(
        &self,
        graph: &ScaffoldGraph,
        layout: &Layout,
        index: &PositionIndex,
        outliers: &[usize],
    ) -> ScaffoldGraph {
        self.plan(graph, layout, index, outliers).apply(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::{Contig, Link};
    use crate::core::types::{LinkOrientation, Orientation};
    use crate::layout::coordinates::CoordinateAssigner;

    /// A -> B placed at A=(0,1000) and B=(1010,2010)
    fn scaffold() -> (ScaffoldGraph, Layout, PositionIndex) {
        let mut g = ScaffoldGraph::new();
        g.add_contig(Contig::new("A", 1000, Orientation::Forward));
        g.add_contig(Contig::new("B", 1000, Orientation::Forward));
        g.add_link("A", "B", Link::new(LinkOrientation::EE, 10.0));
        let component = &g.components()[0];
        let layout = CoordinateAssigner::new(&g).assign(component, g.node("A").unwrap());
        let index = PositionIndex::from_layout(&layout);
        (g, layout, index)
    }

    fn names(g: &ScaffoldGraph) -> Vec<(String, String)> {
        g.links()
            .filter_map(|e| g.endpoints(e))
            .map(|(a, b)| (g.name(a).to_string(), g.name(b).to_string()))
            .collect()
    }

    #[test]
    fn test_rule_table() {
        assert_eq!(LinkSide::for_hit(true, ContigEnd::Start), LinkSide::Predecessors);
        assert_eq!(LinkSide::for_hit(true, ContigEnd::End), LinkSide::Successors);
        assert_eq!(LinkSide::for_hit(false, ContigEnd::Start), LinkSide::Successors);
        assert_eq!(LinkSide::for_hit(false, ContigEnd::End), LinkSide::Predecessors);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let (g, layout, index) = scaffold();
        let delinker = Delinker::default();

        // 101 bases from A's end: a change inside A
        let plan = delinker.plan(&g, &layout, &index, &[899]);
        assert!(plan.is_empty());
        assert_eq!(plan.interior, vec![899]);

        // Exactly 100 bases from A's end: A's successors go
        let plan = delinker.plan(&g, &layout, &index, &[900]);
        let hit = plan.hits[&g.node("A").unwrap()];
        assert_eq!((hit.boundary, hit.distance, hit.forward), (ContigEnd::End, 100, true));
        assert!(names(&plan.apply(&g)).is_empty());
    }

    #[test]
    fn test_forward_start_removes_predecessors() {
        let (g, layout, index) = scaffold();
        let plan = Delinker::default().plan(&g, &layout, &index, &[1015]);
        let hit = plan.hits[&g.node("B").unwrap()];
        assert_eq!(hit.boundary, ContigEnd::Start);
        assert_eq!(hit.side(), LinkSide::Predecessors);
        assert_eq!(plan.link_names(&g), vec![("A".to_string(), "B".to_string())]);
    }

    #[test]
    fn test_reverse_start_removes_successors() {
        // EB places B reversed at (2010,1010); its start is the far end
        let mut g = ScaffoldGraph::new();
        g.add_contig(Contig::new("A", 1000, Orientation::Forward));
        g.add_contig(Contig::new("B", 1000, Orientation::Reverse));
        g.add_contig(Contig::new("C", 500, Orientation::Forward));
        g.add_link("A", "B", Link::new(LinkOrientation::EB, 10.0));
        g.add_link("B", "C", Link::new(LinkOrientation::BE, 10.0));
        let component = &g.components()[0];
        let layout = CoordinateAssigner::new(&g).assign(component, g.node("A").unwrap());
        let index = PositionIndex::from_layout(&layout);
        assert_eq!(
            layout.get(g.node("B").unwrap()).map(|p| (p.start, p.end)),
            Some((2010, 1010))
        );

        let plan = Delinker::default().plan(&g, &layout, &index, &[2000]);
        let hit = plan.hits[&g.node("B").unwrap()];
        assert!(!hit.forward);
        assert_eq!(hit.boundary, ContigEnd::Start);
        assert_eq!(plan.link_names(&g), vec![("B".to_string(), "C".to_string())]);

        // B's end at 1010 is its leading edge: predecessors go
        let plan = Delinker::default().plan(&g, &layout, &index, &[1012]);
        assert_eq!(plan.link_names(&g), vec![("A".to_string(), "B".to_string())]);
    }

    #[test]
    fn test_unregistered_position_skipped() {
        let (g, layout, index) = scaffold();
        let plan = Delinker::default().plan(&g, &layout, &index, &[1005, 5000, 1015]);
        assert_eq!(plan.unregistered, vec![1005, 5000]);
        assert_eq!(plan.links.len(), 1);
    }

    #[test]
    fn test_no_outliers_is_identity() {
        let (g, layout, index) = scaffold();
        let edited = Delinker::default().delink(&g, &layout, &index, &[]);
        assert_eq!(names(&edited), names(&g));
        assert_eq!(edited.contig_count(), g.contig_count());
    }

    #[test]
    fn test_original_graph_untouched() {
        let (g, layout, index) = scaffold();
        let edited = Delinker::default().delink(&g, &layout, &index, &[1000]);
        assert_eq!(edited.link_count(), 0);
        assert_eq!(g.link_count(), 1);
    }
}
