//! Graph edits at coverage change points.
//!
//! Each outlier position is resolved to the contig boundary closest to it. A hit
//! further than `pos_cutoff` bases from any boundary is treated as a change inside
//! a contig and ignored. Otherwise links of the contig are removed according to
//! its placed direction and which boundary was hit:
//!
//! | Placement | Start boundary        | End boundary          |
//! |-----------|-----------------------|-----------------------|
//! | Forward   | remove predecessors   | remove successors     |
//! | Reverse   | remove successors     | remove predecessors   |
//!
//! A change at a contig's leading edge implicates the link bringing in upstream
//! sequence; at the trailing edge, the link to downstream sequence.
//!
//! Planning only reads the graph. [`DelinkPlan::apply`] returns an edited copy and
//! leaves the input untouched.

pub mod plan;

pub use plan::{BoundaryHit, DelinkPlan, Delinker, LinkSide, DEFAULT_POS_CUTOFF};
