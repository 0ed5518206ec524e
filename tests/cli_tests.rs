//! Command-line tests
//!
//! Each test writes a graph and depth table to a temporary directory and runs the
//! binary against them.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CHAIN: &str = r#"{
    "directed": true,
    "multigraph": false,
    "graph": {},
    "nodes": [
        {"id": "A", "length": 600, "orientation": "FOW", "color": "red"},
        {"id": "B", "length": 600, "orientation": "FOW"},
        {"id": "C", "length": 600, "orientation": "FOW"}
    ],
    "links": [
        {"source": "A", "target": "B", "orientation": "EE", "mean": "0.0", "support": 12},
        {"source": "B", "target": "C", "orientation": "EE", "mean": 0}
    ]
}"#;

const LINEAR_CHAIN: &str = r#"{
    "directed": true,
    "nodes": [
        {"id": "A", "length": 100, "orientation": "FOW"},
        {"id": "B", "length": 50, "orientation": "FOW"},
        {"id": "C", "length": 80, "orientation": "FOW"}
    ],
    "edges": [
        {"source": "A", "target": "B", "orientation": "EE", "mean": 10},
        {"source": "B", "target": "C", "orientation": "EE", "mean": 10}
    ]
}"#;

fn depth_table() -> String {
    let mut table = String::new();
    for (contig, depth) in [("A", 20), ("B", 20), ("C", 100)] {
        for pos in 1..=600 {
            writeln!(table, "{contig}\t{pos}\t{depth}").unwrap();
        }
    }
    table
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn cmd() -> Command {
    Command::cargo_bin("scaffold-delink").unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_layout_tsv() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", LINEAR_CHAIN);

    cmd()
        .args(["layout", path_arg(&graph), "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contig\tscaffold\tstart\tend"))
        .stdout(predicate::str::contains("A\tscaffold_0\t0\t100"))
        .stdout(predicate::str::contains("B\tscaffold_0\t110\t160"))
        .stdout(predicate::str::contains("C\tscaffold_0\t170\t250"));
}

#[test]
fn test_layout_json() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", LINEAR_CHAIN);

    let output = cmd()
        .args(["layout", path_arg(&graph), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scaffold = &value["scaffolds"][0];
    assert_eq!(scaffold["start_node"], "A");
    assert_eq!(scaffold["contigs"][2]["contig"], "C");
    assert_eq!(scaffold["contigs"][2]["start"], 170);
    assert_eq!(scaffold["contigs"][2]["end"], 250);
}

#[test]
fn test_detect_text() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());

    cmd()
        .args([
            "detect",
            path_arg(&graph),
            path_arg(&depth),
            "--window-size",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Change Point Report"))
        .stdout(predicate::str::contains("scaffold_0 (3 contigs)"))
        .stdout(predicate::str::contains("Start node: A"));
}

#[test]
fn test_detect_writes_signals() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());
    let signals = dir.path().join("signals");

    cmd()
        .args([
            "detect",
            path_arg(&graph),
            path_arg(&depth),
            "--window-size",
            "100",
            "--signals-dir",
            path_arg(&signals),
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("scaffold\tcontigs"));

    let table = std::fs::read_to_string(signals.join("scaffold_0.tsv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("position\tdepth\tz_score\tmean_ratio"));
    assert_eq!(lines.count(), 1801);
}

#[test]
fn test_delink_writes_edited_graph() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());
    let output = dir.path().join("delinked.json");

    cmd()
        .args([
            "delink",
            path_arg(&graph),
            path_arg(&depth),
            "--window-size",
            "100",
            "--output",
            path_arg(&output),
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("B\tC"))
        .stdout(predicate::str::contains("A\tB").not());

    let edited: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let links = edited["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["source"], "A");
    assert_eq!(links[0]["support"], 12);
    assert_eq!(edited["nodes"][0]["color"], "red");
}

#[test]
fn test_delink_json_report() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());
    let config = write(&dir, "params.json", r#"{"window_size": 100}"#);
    let output = dir.path().join("delinked.json");

    let result = cmd()
        .args([
            "delink",
            path_arg(&graph),
            path_arg(&depth),
            "--config",
            path_arg(&config),
            "-o",
            path_arg(&output),
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(result.status.success());

    let value: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(value["analysed"], 1);
    assert_eq!(value["removed_links"][0]["source"], "B");
    assert_eq!(value["removed_links"][0]["target"], "C");
    assert_eq!(value["scaffolds"][0]["window_size"], 100);
}

#[test]
fn test_invalid_percentile_rejected() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());

    cmd()
        .args([
            "detect",
            path_arg(&graph),
            path_arg(&depth),
            "--peak-percentile",
            "30",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("peak_percentile"));
}

#[test]
fn test_depth_beyond_contig_fails() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", "A\t601\t5\n");

    cmd()
        .args(["detect", path_arg(&graph), path_arg(&depth)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside contig A"));
}

#[test]
fn test_missing_graph_file() {
    cmd()
        .args(["layout", "/nonexistent/graph.json"])
        .assert()
        .failure();
}

#[test]
fn test_delink_requires_output() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "graph.json", CHAIN);
    let depth = write(&dir, "depth.tsv", &depth_table());

    cmd()
        .args(["delink", path_arg(&graph), path_arg(&depth)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}
