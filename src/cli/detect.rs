use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{ConfigArgs, InputArgs, OutputFormat};
use crate::core::graph::ScaffoldGraph;
use crate::coverage::compositor::CoverageTable;
use crate::parsing::depth::read_depth;
use crate::parsing::graph::read_graph;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::engine::{Pipeline, PipelineReport, ScaffoldProfile, ScaffoldReport};

#[derive(Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write one TSV per scaffold with position, depth and both signals
    #[arg(long)]
    pub signals_dir: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: DetectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let (graph, coverage) = load_inputs(&args.input, verbose)?;
    let report = analyse(&graph, &coverage, config, args.signals_dir.as_deref())?;

    match format {
        OutputFormat::Text => print_text_report(&report, false),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

/// Read the graph and the depth table sized to its contigs
pub(crate) fn load_inputs(
    input: &InputArgs,
    verbose: bool,
) -> anyhow::Result<(ScaffoldGraph, CoverageTable)> {
    let graph = read_graph(&input.graph)?;
    if verbose {
        eprintln!(
            "Graph: {} contigs, {} links",
            graph.contig_count(),
            graph.link_count()
        );
    }
    let coverage = read_depth(&input.depth, &graph)?;
    Ok((graph, coverage))
}

/// Run the pipeline, writing signal tables to `signals_dir` if given
pub(crate) fn analyse(
    graph: &ScaffoldGraph,
    coverage: &CoverageTable,
    config: PipelineConfig,
    signals_dir: Option<&Path>,
) -> anyhow::Result<PipelineReport> {
    let pipeline = Pipeline::new(config);
    let Some(dir) = signals_dir else {
        return Ok(pipeline.run(graph, coverage)?);
    };

    std::fs::create_dir_all(dir)?;
    pipeline.run_with(graph, coverage, |scaffold, profile| {
        write_signals(&dir.join(format!("{}.tsv", scaffold.scaffold)), profile)
    })
}

fn write_signals(path: &Path, profile: &ScaffoldProfile) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "position\tdepth\tz_score\tmean_ratio")?;
    let signals = &profile.signals;
    for (i, depth) in profile.depth.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{}\t{:.6}\t{:.6}",
            i, depth, signals.z_score[i], signals.mean_ratio[i]
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn print_text_report(report: &PipelineReport, show_removed: bool) {
    println!("Change Point Report");
    println!("{}", "=".repeat(60));
    println!(
        "\nScaffolds: {} analysed, {} skipped",
        report.analysed(),
        report.skipped()
    );
    println!("Outliers: {}", report.outlier_count());

    for scaffold in &report.scaffolds {
        print_text_scaffold(scaffold, show_removed);
    }

    if show_removed {
        println!("\nRemoved Links ({}):", report.removed_links.len());
        for (source, target) in &report.removed_links {
            println!("  {source} -> {target}");
        }
    }
}

fn print_text_scaffold(scaffold: &ScaffoldReport, show_removed: bool) {
    println!("\n{} ({} contigs)", scaffold.scaffold, scaffold.contigs);
    if let Some(reason) = &scaffold.skipped {
        println!("  Skipped: {reason}");
        return;
    }

    if let Some(start) = &scaffold.start_node {
        println!("  Start node: {start}");
    }
    println!("  Span: {} bp (window {})", scaffold.span, scaffold.window_size);
    if !scaffold.feedback_links.is_empty() {
        println!("  Cycle links ignored for layout: {}", scaffold.feedback_links.len());
    }
    if !scaffold.orientation_conflicts.is_empty() {
        println!(
            "  Orientation conflicts: {}",
            scaffold.orientation_conflicts.join(", ")
        );
    }
    println!("  Outliers: {}", join_positions(&scaffold.outliers));

    println!("  Contigs:");
    for summary in &scaffold.contig_summaries {
        println!(
            "    {:<30} {:>12} {:>12}  mean depth {:.2}",
            summary.contig, summary.start, summary.end, summary.mean_depth
        );
    }

    if show_removed && !scaffold.removed_links.is_empty() {
        println!("  Removed links:");
        for (source, target) in &scaffold.removed_links {
            println!("    {source} -> {target}");
        }
    }
}

pub(crate) fn print_json_report(report: &PipelineReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "analysed": report.analysed(),
        "skipped": report.skipped(),
        "outliers": report.outlier_count(),
        "scaffolds": report.scaffolds,
        "removed_links": report
            .removed_links
            .iter()
            .map(|(source, target)| serde_json::json!({"source": source, "target": target}))
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &PipelineReport) {
    println!("scaffold\tcontigs\tstart_node\tspan\twindow_size\toutliers\tskipped");
    for scaffold in &report.scaffolds {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            scaffold.scaffold,
            scaffold.contigs,
            scaffold.start_node.as_deref().unwrap_or(""),
            scaffold.span,
            scaffold.window_size,
            join_positions(&scaffold.outliers),
            scaffold.skipped.as_deref().unwrap_or(""),
        );
    }
}

fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
