//! # scaffold-delink
//!
//! A library for finding mis-joined contigs in assembly scaffolds from read depth.
//!
//! A scaffolder links contigs into scaffolds using pairing evidence, and some of
//! those links are wrong. When two contigs from different genomes or genomic
//! regions are joined, the read depth along the scaffold usually changes abruptly
//! at the junction. `scaffold-delink` lays out each scaffold's contigs on a common
//! coordinate axis, sums their per-base depth, and removes the links at which the
//! depth profile changes sharply.
//!
//! ## Features
//!
//! - **Cycle breaking**: removes one closing link per simple cycle so every
//!   scaffold can be traversed
//! - **Coordinate assignment**: propagates start/end coordinates over links in both
//!   directions, honoring contig and link orientation
//! - **Depth composition**: sums per-contig depth into one profile per scaffold,
//!   reversing contigs placed on the reverse strand
//! - **Change-point detection**: sliding-window z-statistic and mean-ratio signals
//!   with a window that shrinks for short scaffolds
//! - **Delinking**: maps extreme signal peaks to the nearest contig boundary and
//!   removes the implicated predecessor or successor links
//!
//! ## Example
//!
//! ```rust
//! use scaffold_delink::{Contig, CoverageTable, Link, LinkOrientation, Orientation};
//! use scaffold_delink::{Pipeline, PipelineConfig, ScaffoldGraph};
//!
//! let mut graph = ScaffoldGraph::new();
//! graph.add_contig(Contig::new("ctg1", 400, Orientation::Forward));
//! graph.add_contig(Contig::new("ctg2", 400, Orientation::Forward));
//! graph.add_link("ctg1", "ctg2", Link::new(LinkOrientation::EE, 0.0));
//!
//! // Depth jumps from 10 to 60 where ctg2 begins
//! let mut coverage = CoverageTable::new();
//! coverage.insert("ctg1", vec![10.0; 400]);
//! coverage.insert("ctg2", vec![60.0; 400]);
//!
//! let config = PipelineConfig { window_size: 50, ..PipelineConfig::default() };
//! let report = Pipeline::new(config).run(&graph, &coverage).unwrap();
//! let edited = report.plan.apply(&graph);
//!
//! assert_eq!(report.removed_links, vec![("ctg1".to_string(), "ctg2".to_string())]);
//! assert_eq!(edited.link_count(), 0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contigs, links and the scaffold graph
//! - [`layout`]: Cycle breaking, coordinate assignment and position lookup
//! - [`coverage`]: Depth composition, change-point signals and outlier peaks
//! - [`delink`]: Mapping outliers to contig boundaries and removing links
//! - [`pipeline`]: Per-scaffold driver and configuration
//! - [`parsing`]: Graph JSON and depth table formats
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod coverage;
pub mod delink;
pub mod layout;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::contig::{Contig, Link};
pub use core::graph::{Component, ScaffoldGraph};
pub use core::types::*;
pub use coverage::{ChangePointDetector, CoverageCompositor, CoverageTable, PeakOutlierFinder};
pub use delink::{DelinkPlan, Delinker};
pub use layout::{CoordinateAssigner, CycleBreaker, Layout};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
