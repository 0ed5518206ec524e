use std::path::PathBuf;

use clap::Args;

use crate::cli::detect::{analyse, load_inputs, print_json_report, print_text_report};
use crate::cli::{ConfigArgs, InputArgs, OutputFormat};
use crate::parsing::graph::write_graph;
use crate::pipeline::engine::PipelineReport;

#[derive(Args)]
pub struct DelinkArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Where to write the edited graph (node-link JSON)
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Write one TSV per scaffold with position, depth and both signals
    #[arg(long)]
    pub signals_dir: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: DelinkArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let (graph, coverage) = load_inputs(&args.input, verbose)?;
    let report = analyse(&graph, &coverage, config, args.signals_dir.as_deref())?;

    let edited = report.plan.apply(&graph);
    write_graph(&edited, &args.output)?;

    if verbose {
        eprintln!(
            "Wrote {} ({} of {} links kept)",
            args.output.display(),
            edited.link_count(),
            graph.link_count()
        );
    }

    match format {
        OutputFormat::Text => print_text_report(&report, true),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Tsv => print_tsv_removed(&report),
    }

    Ok(())
}

fn print_tsv_removed(report: &PipelineReport) {
    println!("source\ttarget");
    for (source, target) in &report.removed_links {
        println!("{source}\t{target}");
    }
}
