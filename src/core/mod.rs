//! Core data types for scaffold layout and delinking.
//!
//! - [`Contig`]: an assembled fragment with length and orientation (graph node)
//! - [`Link`]: a directed join between two contigs with an orientation code and gap estimate
//! - [`ScaffoldGraph`]: the directed assembly graph, its components and start node selection
//! - [`Orientation`], [`LinkOrientation`], [`ContigEnd`]: orientation vocabulary
//!
//! ## Link Orientation Codes
//!
//! | Code | Source end at junction | Target end away from junction |
//! |------|------------------------|-------------------------------|
//! | EE   | end                    | end                           |
//! | EB   | end                    | beginning                     |
//! | BB   | beginning              | beginning                     |
//! | BE   | beginning              | end                           |

pub mod contig;
pub mod graph;
pub mod types;

pub use contig::{Contig, Link};
pub use graph::{Component, ScaffoldGraph};
pub use types::{ContigEnd, LinkOrientation, Orientation};
