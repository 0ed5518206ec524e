use std::path::PathBuf;

use clap::Args;

use crate::cli::{LayoutConfigArgs, OutputFormat};
use crate::core::graph::{Component, ScaffoldGraph};
use crate::layout::coordinates::{Layout, LayoutError};
use crate::parsing::graph::read_graph;
use crate::pipeline::engine::{placed_contigs, Pipeline};

#[derive(Args)]
pub struct LayoutArgs {
    /// Scaffold graph in node-link JSON format
    #[arg(required = true)]
    pub graph: PathBuf,

    #[command(flatten)]
    pub config: LayoutConfigArgs,
}

pub fn run(args: LayoutArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let graph = read_graph(&args.graph)?;

    if verbose {
        eprintln!(
            "Graph: {} contigs, {} links",
            graph.contig_count(),
            graph.link_count()
        );
    }

    let layouts = Pipeline::new(config).layout(&graph);

    match format {
        OutputFormat::Text => print_text_layout(&graph, &layouts),
        OutputFormat::Json => print_json_layout(&graph, &layouts)?,
        OutputFormat::Tsv => print_tsv_layout(&graph, &layouts),
    }

    Ok(())
}

type ComponentLayout = (Component, Result<Layout, LayoutError>);

fn print_text_layout(graph: &ScaffoldGraph, layouts: &[ComponentLayout]) {
    println!("Scaffold Layout");
    println!("{}", "=".repeat(60));

    for (component, result) in layouts {
        match result {
            Ok(layout) => {
                println!(
                    "\n{} ({} contigs, start {}, span {} bp)",
                    component.name(),
                    component.len(),
                    graph.name(layout.start_node),
                    layout.max_coord() + 1
                );
                for placed in placed_contigs(graph, layout) {
                    let strand = if placed.start <= placed.end { '+' } else { '-' };
                    println!(
                        "  {:<30} {:>12} {:>12}  {}",
                        placed.contig, placed.start, placed.end, strand
                    );
                }
            }
            Err(e) => {
                println!("\n{} ({} contigs): skipped", component.name(), component.len());
                println!("  {e}");
            }
        }
    }
}

fn print_json_layout(graph: &ScaffoldGraph, layouts: &[ComponentLayout]) -> anyhow::Result<()> {
    let scaffolds: Vec<serde_json::Value> = layouts
        .iter()
        .map(|(component, result)| match result {
            Ok(layout) => serde_json::json!({
                "scaffold": component.name(),
                "start_node": graph.name(layout.start_node),
                "contigs": placed_contigs(graph, layout),
            }),
            Err(e) => serde_json::json!({
                "scaffold": component.name(),
                "skipped": e.to_string(),
                "contigs": component
                    .nodes
                    .iter()
                    .map(|&n| graph.name(n))
                    .collect::<Vec<_>>(),
            }),
        })
        .collect();

    let output = serde_json::json!({ "scaffolds": scaffolds });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_layout(graph: &ScaffoldGraph, layouts: &[ComponentLayout]) {
    println!("contig\tscaffold\tstart\tend");
    for (component, result) in layouts {
        let Ok(layout) = result else {
            continue;
        };
        for placed in placed_contigs(graph, layout) {
            println!(
                "{}\t{}\t{}\t{}",
                placed.contig,
                component.name(),
                placed.start,
                placed.end
            );
        }
    }
}
