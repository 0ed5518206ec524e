use petgraph::stable_graph::NodeIndex;

use crate::layout::coordinates::Layout;

/// Maps scaffold coordinates to the contigs whose placement covers them.
///
/// Each contig covers the closed interval between its two coordinates, so both
/// boundary positions resolve to the contig.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    /// `(low, high, contig)` sorted by `low`, then node order
    intervals: Vec<(i64, i64, NodeIndex)>,
}

impl PositionIndex {
    pub fn from_layout(layout: &Layout) -> Self {
        let mut intervals: Vec<_> = layout
            .iter()
            .map(|(node, placement)| (placement.min(), placement.max(), node))
            .collect();
        intervals.sort_unstable();
        Self { intervals }
    }

    /// Contigs covering `position` in node order, or `None` if the position is not registered
    pub fn contigs_at(&self, position: i64) -> Option<Vec<NodeIndex>> {
        let mut hits: Vec<NodeIndex> = self
            .intervals
            .iter()
            .take_while(|(low, _, _)| *low <= position)
            .filter(|(_, high, _)| *high >= position)
            .map(|&(_, _, node)| node)
            .collect();
        if hits.is_empty() {
            return None;
        }
        hits.sort_unstable();
        Some(hits)
    }

    /// Largest registered position
    pub fn max_position(&self) -> Option<i64> {
        self.intervals.iter().map(|&(_, high, _)| high).max()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
