//! Per-scaffold driver.
//!
//! For each weakly connected component of the input graph:
//!
//! 1. cycles are broken on a working copy ([`crate::layout::CycleBreaker`])
//! 2. the start node is chosen and global coordinates assigned
//! 3. contig depth vectors are summed into a scaffold profile
//! 4. change-point signals are computed and their extreme peaks located
//! 5. peaks near contig boundaries become link removals
//!
//! Removals from all components are merged into one [`crate::delink::DelinkPlan`]
//! and applied to the input graph, so links dropped only to make layout possible
//! survive in the output.
//!
//! Components that cannot be laid out are logged and reported as skipped.
//! Coverage that does not match the graph aborts the run.

pub mod config;
pub mod engine;

pub use config::PipelineConfig;
pub use engine::{
    layout_component, placed_contigs, PipelineError, PipelineReport, PlacedContig, Pipeline,
    ScaffoldProfile, ScaffoldReport,
};
