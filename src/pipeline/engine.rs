use std::collections::BTreeSet;

use petgraph::stable_graph::EdgeIndex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::graph::{Component, ScaffoldGraph};
use crate::coverage::changepoint::{ChangePointDetector, ChangePointSignals};
use crate::coverage::compositor::{ContigSummary, CoverageCompositor, CoverageError, CoverageTable};
use crate::coverage::outliers::PeakOutlierFinder;
use crate::delink::plan::{DelinkPlan, Delinker};
use crate::layout::coordinates::{CoordinateAssigner, Layout, LayoutError, Placement};
use crate::layout::cycles::CycleBreaker;
use crate::layout::positions::PositionIndex;
use crate::parsing::ParseError;
use crate::pipeline::config::PipelineConfig;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

/// One contig's coordinates in the `layout` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedContig {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

/// Outcome for one weakly connected component
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub scaffold: String,
    pub contigs: usize,
    pub start_node: Option<String>,

    /// Length of the composed depth profile
    pub span: usize,

    /// Window length after adapting to the covered length
    pub window_size: usize,

    /// Links dropped to make the component acyclic for layout
    pub feedback_links: Vec<(String, String)>,
    pub orientation_conflicts: Vec<String>,
    pub outliers: Vec<usize>,
    pub contig_summaries: Vec<ContigSummary>,
    pub removed_links: Vec<(String, String)>,

    /// Reason the component was not analysed
    pub skipped: Option<String>,
}

impl ScaffoldReport {
    fn new(graph: &ScaffoldGraph, component: &Component) -> Self {
        Self {
            scaffold: component.name(),
            contigs: component.len(),
            start_node: graph
                .start_node(component)
                .map(|n| graph.name(n).to_string()),
            span: 0,
            window_size: 0,
            feedback_links: Vec::new(),
            orientation_conflicts: Vec::new(),
            outliers: Vec::new(),
            contig_summaries: Vec::new(),
            removed_links: Vec::new(),
            skipped: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Depth profile and signals of an analysed scaffold, handed to output sinks
#[derive(Debug, Clone)]
pub struct ScaffoldProfile {
    pub layout: Layout,
    pub depth: Vec<f64>,
    pub signals: ChangePointSignals,
}

/// Reports for every component plus the merged edit plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub scaffolds: Vec<ScaffoldReport>,
    pub removed_links: Vec<(String, String)>,

    #[serde(skip)]
    pub plan: DelinkPlan,
}

impl PipelineReport {
    pub fn analysed(&self) -> usize {
        self.scaffolds.iter().filter(|s| !s.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.scaffolds.len() - self.analysed()
    }

    pub fn outlier_count(&self) -> usize {
        self.scaffolds.iter().map(|s| s.outliers.len()).sum()
    }
}

/// Cycle-free copy of a graph and the links removed to get there
struct AcyclicGraph {
    graph: ScaffoldGraph,
    feedback: Vec<BTreeSet<EdgeIndex>>,
}

/// Runs cycle breaking, layout, coverage composition, change-point detection and
/// delinking over every component of a graph
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn break_cycles(&self, graph: &ScaffoldGraph, components: &[Component]) -> AcyclicGraph {
        let breaker = CycleBreaker::new(self.config.max_cycles);
        let feedback: Vec<BTreeSet<EdgeIndex>> = components
            .iter()
            .map(|c| breaker.feedback_links(graph, c).links)
            .collect();
        let all: BTreeSet<EdgeIndex> = feedback.iter().flatten().copied().collect();
        debug!("Removing {} feedback links before layout", all.len());
        AcyclicGraph {
            graph: graph.without_links(&all),
            feedback,
        }
    }

    /// Global coordinates of every component, without coverage.
    ///
    /// Components that cannot be laid out completely are returned as errors.
    pub fn layout(&self, graph: &ScaffoldGraph) -> Vec<(Component, Result<Layout, LayoutError>)> {
        let components = graph.components();
        let acyclic = self.break_cycles(graph, &components);

        components
            .into_iter()
            .map(|component| {
                let result = layout_component(&acyclic.graph, &component);
                if let Err(e) = &result {
                    warn!("{e}");
                }
                (component, result)
            })
            .collect()
    }

    /// Analyse every component.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Coverage` on the first coverage vector that is
    /// missing or does not fit its contig.
    pub fn run(
        &self,
        graph: &ScaffoldGraph,
        coverage: &CoverageTable,
    ) -> Result<PipelineReport, PipelineError> {
        self.run_with(graph, coverage, |_, _| Ok::<(), PipelineError>(()))
    }

    /// Analyse every component, passing each analysed scaffold's profile to `sink`
    ///
    /// # Errors
    ///
    /// Returns the first coverage error, or the first error from `sink`.
    pub fn run_with<F, E>(
        &self,
        graph: &ScaffoldGraph,
        coverage: &CoverageTable,
        mut sink: F,
    ) -> Result<PipelineReport, E>
    where
        F: FnMut(&ScaffoldReport, &ScaffoldProfile) -> Result<(), E>,
        E: From<PipelineError>,
    {
        let components = graph.components();
        let acyclic = self.break_cycles(graph, &components);
        let mut report = PipelineReport::default();

        for (component, feedback) in components.iter().zip(&acyclic.feedback) {
            let (scaffold, profile, plan) =
                self.analyse(graph, &acyclic.graph, component, coverage, feedback)
                    .map_err(PipelineError::from)?;
            if let Some(profile) = &profile {
                sink(&scaffold, profile)?;
            }
            report.plan.extend(plan);
            report.scaffolds.push(scaffold);
        }

        report.removed_links = report.plan.link_names(graph);
        info!(
            "{} scaffolds analysed, {} skipped, {} outliers, {} links removed",
            report.analysed(),
            report.skipped(),
            report.outlier_count(),
            report.removed_links.len()
        );
        Ok(report)
    }

    fn analyse(
        &self,
        graph: &ScaffoldGraph,
        acyclic: &ScaffoldGraph,
        component: &Component,
        coverage: &CoverageTable,
        feedback: &BTreeSet<EdgeIndex>,
    ) -> Result<(ScaffoldReport, Option<ScaffoldProfile>, DelinkPlan), CoverageError> {
        let mut report = ScaffoldReport::new(acyclic, component);
        report.feedback_links = link_names(graph, feedback);

        let Some(start) = acyclic.start_node(component) else {
            let e = LayoutError::NoStartNode {
                component: component.name(),
            };
            warn!("{e}");
            report.skipped = Some(e.to_string());
            return Ok((report, None, DelinkPlan::default()));
        };

        let profile = match CoverageCompositor::new(acyclic, coverage).compose(component, start) {
            Ok(profile) => profile,
            Err(CoverageError::Layout(e)) => {
                warn!("{e}");
                report.skipped = Some(e.to_string());
                return Ok((report, None, DelinkPlan::default()));
            }
            Err(e) => return Err(e),
        };

        let conflicts = profile.layout.orientation_conflicts(graph);
        if !conflicts.is_empty() {
            warn!(
                "{}: {} contigs placed against their orientation attribute (first: {})",
                component.name(),
                conflicts.len(),
                graph.name(conflicts[0])
            );
        }
        report.orientation_conflicts = conflicts
            .iter()
            .map(|&n| graph.name(n).to_string())
            .collect();

        let signals = ChangePointDetector::new(self.config.window_size).detect(&profile.depth);
        let finder = PeakOutlierFinder {
            percentile: self.config.peak_percentile,
            neighbor_window: self.config.neighbor_window,
            filter_neighbors: self.config.filter_neighbors,
        };
        let outliers = finder.find(signals.get(self.config.statistic));

        let index = PositionIndex::from_layout(&profile.layout);
        let plan = Delinker::new(self.config.pos_cutoff).plan(graph, &profile.layout, &index, &outliers);

        report.span = profile.depth.len();
        report.window_size = signals.window_size;
        report.contig_summaries =
            CoverageCompositor::new(acyclic, coverage).summaries(&profile.layout);
        report.removed_links = plan.link_names(graph);
        report.outliers = outliers;

        info!(
            "{}: {} contigs over {} bp, {} outliers, {} links to remove",
            report.scaffold,
            report.contigs,
            report.span,
            report.outliers.len(),
            report.removed_links.len()
        );

        let profile = ScaffoldProfile {
            layout: profile.layout,
            depth: profile.depth,
            signals,
        };
        Ok((report, Some(profile), plan))
    }
}

/// Lay out one component of an acyclic graph from its start node
///
/// # Errors
///
/// Returns `LayoutError` if no start node exists or some contigs stay unplaced.
pub fn layout_component(graph: &ScaffoldGraph, component: &Component) -> Result<Layout, LayoutError> {
    let start = graph
        .start_node(component)
        .ok_or_else(|| LayoutError::NoStartNode {
            component: component.name(),
        })?;
    let layout = CoordinateAssigner::new(graph).assign(component, start);
    layout.check_complete(graph, component)?;
    Ok(layout)
}

/// Named coordinates of a layout, in node order
pub fn placed_contigs(graph: &ScaffoldGraph, layout: &Layout) -> Vec<PlacedContig> {
    layout
        .iter()
        .map(|(node, Placement { start, end })| PlacedContig {
            contig: graph.name(node).to_string(),
            start,
            end,
        })
        .collect()
}

fn link_names(graph: &ScaffoldGraph, links: &BTreeSet<EdgeIndex>) -> Vec<(String, String)> {
    links
        .iter()
        .filter_map(|&e| graph.endpoints(e))
        .map(|(a, b)| (graph.name(a).to_string(), graph.name(b).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::{Contig, Link};
    use crate::core::types::{LinkOrientation, Orientation};

    fn pair() -> ScaffoldGraph {
        let mut g = ScaffoldGraph::new();
        g.add_contig(Contig::new("A", 100, Orientation::Forward));
        g.add_contig(Contig::new("B", 50, Orientation::Forward));
        g.add_link("A", "B", Link::new(LinkOrientation::EE, 10.0));
        g
    }

    #[test]
    fn test_layout_all_components() {
        let mut g = pair();
        g.add_contig(Contig::new("lonely", 30, Orientation::Forward));

        let layouts = Pipeline::new(PipelineConfig::default()).layout(&g);
        assert_eq!(layouts.len(), 2);

        let layout = layouts[0].1.as_ref().unwrap();
        let placed = placed_contigs(&g, layout);
        assert_eq!(
            placed,
            vec![
                PlacedContig { contig: "A".into(), start: 0, end: 100 },
                PlacedContig { contig: "B".into(), start: 110, end: 160 },
            ]
        );
        assert!(matches!(layouts[1].1, Err(LayoutError::NoStartNode { .. })));
    }

    #[test]
    fn test_singleton_component_skipped() {
        let mut g = pair();
        g.add_contig(Contig::new("lonely", 30, Orientation::Forward));
        let mut coverage = CoverageTable::new();
        coverage.insert("A", vec![5.0; 100]);
        coverage.insert("B", vec![5.0; 50]);

        let report = Pipeline::new(PipelineConfig::default()).run(&g, &coverage).unwrap();
        assert_eq!(report.analysed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.scaffolds[0].span, 161);
        assert!(report.scaffolds[1].skipped.is_some());
    }

    #[test]
    fn test_missing_coverage_aborts() {
        let g = pair();
        let mut coverage = CoverageTable::new();
        coverage.insert("A", vec![5.0; 100]);
        let err = Pipeline::new(PipelineConfig::default())
            .run(&g, &coverage)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Coverage(CoverageError::MissingCoverage { .. })
        ));
    }

    #[test]
    fn test_feedback_links_reported() {
        let mut g = pair();
        g.add_link("B", "A", Link::new(LinkOrientation::EE, 10.0));
        let mut coverage = CoverageTable::new();
        coverage.insert("A", vec![5.0; 100]);
        coverage.insert("B", vec![5.0; 50]);

        let report = Pipeline::new(PipelineConfig::default()).run(&g, &coverage).unwrap();
        let scaffold = &report.scaffolds[0];
        assert_eq!(scaffold.feedback_links, vec![("B".to_string(), "A".to_string())]);
        assert_eq!(scaffold.start_node.as_deref(), Some("A"));
        assert!(scaffold.skipped.is_none());
    }

    #[test]
    fn test_sink_sees_profiles() {
        let g = pair();
        let mut coverage = CoverageTable::new();
        coverage.insert("A", vec![5.0; 100]);
        coverage.insert("B", vec![5.0; 50]);

        let mut seen = Vec::new();
        Pipeline::new(PipelineConfig::default())
            .run_with(&g, &coverage, |scaffold, profile| {
                seen.push((scaffold.scaffold.clone(), profile.depth.len()));
                Ok::<(), PipelineError>(())
            })
            .unwrap();
        assert_eq!(seen, vec![("scaffold_0".to_string(), 161)]);
    }
}
