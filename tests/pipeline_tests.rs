//! End-to-end scenarios for the delinking pipeline
//!
//! These build small scaffolds with a known depth step and check which links the
//! pipeline removes.

use scaffold_delink::layout::coordinates::Placement;
use scaffold_delink::parsing::graph::{parse_graph_str, read_graph, write_graph};
use scaffold_delink::{
    Contig, CoverageTable, Link, LinkOrientation, Orientation, Pipeline, PipelineConfig,
    ScaffoldGraph,
};

fn config(window_size: usize) -> PipelineConfig {
    PipelineConfig {
        window_size,
        ..PipelineConfig::default()
    }
}

fn link(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

/// A -> B -> C head to tail, 600 bp each, depth 20/20/100
fn misjoined_chain() -> (ScaffoldGraph, CoverageTable) {
    let mut graph = ScaffoldGraph::new();
    for name in ["A", "B", "C"] {
        graph.add_contig(Contig::new(name, 600, Orientation::Forward));
    }
    graph.add_link("A", "B", Link::new(LinkOrientation::EE, 0.0));
    graph.add_link("B", "C", Link::new(LinkOrientation::EE, 0.0));

    let mut coverage = CoverageTable::new();
    coverage.insert("A", vec![20.0; 600]);
    coverage.insert("B", vec![20.0; 600]);
    coverage.insert("C", vec![100.0; 600]);
    (graph, coverage)
}

#[test]
fn test_depth_step_removes_junction_link() {
    let (graph, coverage) = misjoined_chain();
    let report = Pipeline::new(config(100)).run(&graph, &coverage).unwrap();

    assert_eq!(report.analysed(), 1);
    let scaffold = &report.scaffolds[0];
    assert_eq!(scaffold.start_node.as_deref(), Some("A"));
    assert_eq!(scaffold.span, 1801);
    assert_eq!(scaffold.window_size, 100);
    assert!(scaffold
        .outliers
        .iter()
        .any(|&p| (1195..=1205).contains(&p)));

    assert!(report.removed_links.contains(&link("B", "C")));
    assert!(!report.removed_links.contains(&link("A", "B")));

    let edited = report.plan.apply(&graph);
    assert_eq!(edited.link_count(), 1);
    assert!(edited
        .find_link(edited.node("A").unwrap(), edited.node("B").unwrap())
        .is_some());
    // The input graph is left as it was
    assert_eq!(graph.link_count(), 2);
}

#[test]
fn test_contig_summaries() {
    let (graph, coverage) = misjoined_chain();
    let report = Pipeline::new(config(100)).run(&graph, &coverage).unwrap();

    let summaries = &report.scaffolds[0].contig_summaries;
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[2].contig, "C");
    assert_eq!((summaries[2].start, summaries[2].end), (1200, 1800));
    assert!((summaries[2].mean_depth - 100.0).abs() < 1e-9);
}

#[test]
fn test_reversed_contig_junction() {
    // B is placed reversed at (1200, 600); its coverage is laid down back to front
    let mut graph = ScaffoldGraph::new();
    graph.add_contig(Contig::new("A", 600, Orientation::Forward));
    graph.add_contig(Contig::new("B", 600, Orientation::Reverse));
    graph.add_link("A", "B", Link::new(LinkOrientation::EB, 0.0));

    let mut coverage = CoverageTable::new();
    coverage.insert("A", vec![20.0; 600]);
    coverage.insert("B", vec![100.0; 600]);

    let report = Pipeline::new(config(100)).run(&graph, &coverage).unwrap();
    let scaffold = &report.scaffolds[0];
    assert!(scaffold.orientation_conflicts.is_empty());
    let b = scaffold
        .contig_summaries
        .iter()
        .find(|s| s.contig == "B")
        .unwrap();
    assert_eq!((b.start, b.end), (1200, 600));

    assert_eq!(report.removed_links, vec![link("A", "B")]);
}

#[test]
fn test_cycle_is_ignored_for_layout() {
    // A -> B -> C closed into a ring; C -> A is dropped for layout only
    let json = r#"{
        "directed": true,
        "nodes": [
            {"id": "A", "length": 100, "orientation": "FOW"},
            {"id": "B", "length": "50", "orientation": "FOW"},
            {"id": "C", "length": 80, "orientation": "FOW"}
        ],
        "links": [
            {"source": "A", "target": "B", "orientation": "EE", "mean": "10"},
            {"source": "B", "target": "C", "orientation": "EE", "mean": 10.0},
            {"source": "C", "target": "A", "orientation": "EE", "mean": 10.0}
        ]
    }"#;
    let graph = parse_graph_str(json).unwrap();

    let layouts = Pipeline::new(PipelineConfig::default()).layout(&graph);
    assert_eq!(layouts.len(), 1);
    let layout = layouts[0].1.as_ref().unwrap();
    let at = |name: &str| layout.get(graph.node(name).unwrap()).unwrap();
    assert_eq!(at("A"), Placement::new(0, 100));
    assert_eq!(at("B"), Placement::new(110, 160));
    assert_eq!(at("C"), Placement::new(170, 250));

    let mut coverage = CoverageTable::new();
    coverage.insert("A", vec![10.0; 100]);
    coverage.insert("B", vec![10.0; 50]);
    coverage.insert("C", vec![10.0; 80]);
    let report = Pipeline::new(PipelineConfig::default())
        .run(&graph, &coverage)
        .unwrap();
    assert_eq!(report.scaffolds[0].feedback_links, vec![link("C", "A")]);
}

#[test]
fn test_independent_scaffolds() {
    let (mut graph, mut coverage) = misjoined_chain();
    graph.add_contig(Contig::new("X", 300, Orientation::Forward));
    graph.add_contig(Contig::new("Y", 300, Orientation::Forward));
    graph.add_contig(Contig::new("single", 300, Orientation::Forward));
    graph.add_link("X", "Y", Link::new(LinkOrientation::EE, 5.0));
    coverage.insert("X", vec![30.0; 300]);
    coverage.insert("Y", vec![30.0; 300]);
    coverage.insert("single", vec![30.0; 300]);

    let report = Pipeline::new(config(100)).run(&graph, &coverage).unwrap();
    let names: Vec<&str> = report
        .scaffolds
        .iter()
        .map(|s| s.scaffold.as_str())
        .collect();
    assert_eq!(names, vec!["scaffold_0", "scaffold_1", "scaffold_2"]);
    assert_eq!(report.analysed(), 2);
    assert!(report.scaffolds[2].is_skipped());
    assert!(report.removed_links.contains(&link("B", "C")));
}

#[test]
fn test_round_trip_through_files() {
    let (graph, coverage) = misjoined_chain();
    let report = Pipeline::new(config(100)).run(&graph, &coverage).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delinked.json");
    write_graph(&report.plan.apply(&graph), &path).unwrap();

    let back = read_graph(&path).unwrap();
    assert_eq!(back.contig_count(), 3);
    assert_eq!(back.link_count(), 1);
    assert!(back
        .find_link(back.node("B").unwrap(), back.node("C").unwrap())
        .is_none());
}
