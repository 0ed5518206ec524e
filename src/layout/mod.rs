//! Global coordinate assignment for scaffolds.
//!
//! A scaffold (weakly connected component of the assembly graph) is laid out in
//! three steps:
//!
//! 1. [`CycleBreaker`] removes one closing link per simple cycle so that a
//!    traversal order exists
//! 2. [`CoordinateAssigner`] propagates `(start, end)` coordinates from a start
//!    node across links in both directions, keeping the largest-start estimate
//!    when a contig is reached more than once, then shifts everything so the
//!    smallest coordinate is 0
//! 3. [`PositionIndex`] answers which contigs cover a given coordinate
//!
//! Finding the best layout is NP-hard; the greedy merge rule trades optimality for
//! a single deterministic answer.

pub mod coordinates;
pub mod cycles;
pub mod positions;

pub use coordinates::{CoordinateAssigner, Layout, LayoutError, Placement};
pub use cycles::{CycleBreaker, FeedbackLinks};
pub use positions::PositionIndex;
