use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;
use thiserror::Error;

use crate::core::graph::{Component, ScaffoldGraph};
use crate::layout::coordinates::{CoordinateAssigner, Layout, LayoutError, Placement};
use crate::utils::count_to_f64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverageError {
    #[error("{component}: no coverage for contig {contig}")]
    MissingCoverage { component: String, contig: String },

    #[error(
        "{component}: coverage for contig {contig} has {found} values but its placement spans {expected} bases"
    )]
    LengthMismatch {
        component: String,
        contig: String,
        expected: u64,
        found: usize,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Per-base depth vectors keyed by contig name
#[derive(Debug, Clone, Default)]
pub struct CoverageTable {
    depths: HashMap<String, Vec<f64>>,
}

impl CoverageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, contig: impl Into<String>, depth: Vec<f64>) {
        self.depths.insert(contig.into(), depth);
    }

    pub fn get(&self, contig: &str) -> Option<&[f64]> {
        self.depths.get(contig).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, contig: &str) -> Option<&mut Vec<f64>> {
        self.depths.get_mut(contig)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Depth profile of one scaffold together with the layout it was built from
#[derive(Debug, Clone)]
pub struct ScaffoldDepth {
    /// Summed depth indexed by global coordinate, `max_coord + 1` long
    pub depth: Vec<f64>,
    pub layout: Layout,
}

/// Mean depth and placement of one contig
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContigSummary {
    pub contig: String,
    pub mean_depth: f64,
    pub start: i64,
    pub end: i64,
}

/// Builds the dense depth profile of a scaffold from per-contig coverage
pub struct CoverageCompositor<'a> {
    graph: &'a ScaffoldGraph,
    coverage: &'a CoverageTable,
}

impl<'a> CoverageCompositor<'a> {
    pub fn new(graph: &'a ScaffoldGraph, coverage: &'a CoverageTable) -> Self {
        Self { graph, coverage }
    }

    /// Lay out the component from `start_node` and accumulate its coverage
    ///
    /// # Errors
    ///
    /// Returns `CoverageError::Layout` if some contigs cannot be placed,
    /// `CoverageError::MissingCoverage` if a contig has no coverage vector, or
    /// `CoverageError::LengthMismatch` if a vector does not fit the contig's placement.
    pub fn compose(
        &self,
        component: &Component,
        start_node: NodeIndex,
    ) -> Result<ScaffoldDepth, CoverageError> {
        let layout = CoordinateAssigner::new(self.graph).assign(component, start_node);
        layout.check_complete(self.graph, component)?;
        let depth = self.accumulate(component, &layout)?;
        Ok(ScaffoldDepth { depth, layout })
    }

    /// Sum each contig's coverage into its placement window.
    ///
    /// Reverse placements (`start > end`) receive the vector back to front so that
    /// the first base lands on `start`.
    pub fn accumulate(
        &self,
        component: &Component,
        layout: &Layout,
    ) -> Result<Vec<f64>, CoverageError> {
        let size = usize::try_from(layout.max_coord()).unwrap_or(0) + 1;
        let mut depth = vec![0.0; size];

        for (node, placement) in layout.iter() {
            let contig = self.graph.name(node);
            let values = self.contig_coverage(component, contig, placement)?;
            let start = usize::try_from(placement.start).unwrap_or(0);
            if placement.is_forward() {
                for (slot, value) in depth[start..].iter_mut().zip(values) {
                    *slot += value;
                }
            } else {
                for (offset, value) in values.iter().enumerate() {
                    depth[start - offset] += value;
                }
            }
        }

        Ok(depth)
    }

    /// Mean depth and coordinates of each placed contig, in node order
    pub fn summaries(&self, layout: &Layout) -> Vec<ContigSummary> {
        layout
            .iter()
            .map(|(node, placement)| {
                let contig = self.graph.name(node);
                let mean_depth = self
                    .coverage
                    .get(contig)
                    .filter(|v| !v.is_empty())
                    .map_or(0.0, |v| v.iter().sum::<f64>() / count_to_f64(v.len()));
                ContigSummary {
                    contig: contig.to_string(),
                    mean_depth,
                    start: placement.start,
                    end: placement.end,
                }
            })
            .collect()
    }

    fn contig_coverage(
        &self,
        component: &Component,
        contig: &str,
        placement: Placement,
    ) -> Result<&'a [f64], CoverageError> {
        let values = self
            .coverage
            .get(contig)
            .ok_or_else(|| CoverageError::MissingCoverage {
                component: component.name(),
                contig: contig.to_string(),
            })?;
        if placement.len() != values.len() as u64 {
            return Err(CoverageError::LengthMismatch {
                component: component.name(),
                contig: contig.to_string(),
                expected: placement.len(),
                found: values.len(),
            });
        }
        Ok(values)
    }
}
