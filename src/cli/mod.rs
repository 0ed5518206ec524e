//! Command-line interface for scaffold-delink.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **layout**: Assign global coordinates to the contigs of every scaffold
//! - **detect**: Find coverage change points along each scaffold
//! - **delink**: Remove the links implicated by change points and write the edited graph
//!
//! ## Usage
//!
//! ```text
//! # Contig coordinates per scaffold
//! scaffold-delink layout scaffolds.json
//!
//! # Change points, with per-scaffold signal tables for plotting
//! scaffold-delink detect scaffolds.json depth.tsv.gz --signals-dir signals/
//!
//! # Edit the graph
//! scaffold-delink delink scaffolds.json depth.tsv.gz --output delinked.json
//!
//! # JSON output for scripting, parameters from a file
//! scaffold-delink delink scaffolds.json depth.tsv --config params.json -o out.json --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::coverage::changepoint::Statistic;
use crate::pipeline::config::PipelineConfig;

pub mod delink;
pub mod detect;
pub mod layout;

#[derive(Parser)]
#[command(name = "scaffold-delink")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Detect coverage change points along scaffolds and delink mis-joined contigs")]
#[command(
    long_about = "scaffold-delink lays out the contigs of each scaffold in an assembly graph on a common coordinate axis, sums their per-base depth into a scaffold profile, and looks for abrupt coverage changes.\n\nChange points that fall on a contig boundary implicate the link joining that contig to its neighbors:\n- detect reports the change points and per-contig depth\n- delink removes the implicated links and writes the edited graph"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign global coordinates to contigs
    Layout(layout::LayoutArgs),

    /// Find coverage change points along scaffolds
    Detect(detect::DetectArgs),

    /// Remove links at coverage change points
    Delink(delink::DelinkArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Pipeline parameters; flags override values from `--config`
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// JSON file with pipeline parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sliding window length for change-point statistics [default: 1500]
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Percentile above which a peak is an outlier [default: 99]
    #[arg(long)]
    pub peak_percentile: Option<f64>,

    /// Collapse outliers closer than this many bases [default: 100]
    #[arg(long)]
    pub neighbor_window: Option<usize>,

    /// Keep every outlier peak instead of collapsing neighbors
    #[arg(long)]
    pub no_neighbor_filter: bool,

    /// Maximum distance from an outlier to the contig boundary it implicates [default: 100]
    #[arg(long)]
    pub pos_cutoff: Option<u64>,

    /// Signal used for outlier detection [default: mean-ratio]
    #[arg(long, value_enum)]
    pub statistic: Option<Statistic>,

    /// Cap on simple cycles enumerated per scaffold [default: 100000]
    #[arg(long)]
    pub max_cycles: Option<usize>,
}

impl ConfigArgs {
    /// Defaults, then the config file, then explicit flags
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result is invalid.
    pub fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(v) = self.window_size {
            config.window_size = v;
        }
        if let Some(v) = self.peak_percentile {
            config.peak_percentile = v;
        }
        if let Some(v) = self.neighbor_window {
            config.neighbor_window = v;
        }
        if self.no_neighbor_filter {
            config.filter_neighbors = false;
        }
        if let Some(v) = self.pos_cutoff {
            config.pos_cutoff = v;
        }
        if let Some(v) = self.statistic {
            config.statistic = v;
        }
        if let Some(v) = self.max_cycles {
            config.max_cycles = v;
        }

        config.validate()?;
        Ok(config)
    }
}

/// The parameters `layout` reads; flags override values from `--config`
#[derive(Args, Debug, Default)]
pub struct LayoutConfigArgs {
    /// JSON file with pipeline parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Cap on simple cycles enumerated per scaffold [default: 100000]
    #[arg(long)]
    pub max_cycles: Option<usize>,
}

impl LayoutConfigArgs {
    /// Defaults, then the config file, then `--max-cycles`
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result is invalid.
    pub fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        ConfigArgs {
            config: self.config.clone(),
            max_cycles: self.max_cycles,
            ..ConfigArgs::default()
        }
        .resolve()
    }
}

/// Graph and depth table inputs shared by `detect` and `delink`
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Scaffold graph in node-link JSON format
    #[arg(required = true)]
    pub graph: PathBuf,

    /// Per-base depth table (samtools depth format, optionally .gz)
    #[arg(required = true)]
    pub depth: PathBuf,
}
