//! Scaffold depth profiles and change-point detection.
//!
//! - [`CoverageCompositor`]: sums per-contig depth vectors into a dense array over
//!   the scaffold's global coordinates
//! - [`ChangePointDetector`]: sliding-window z-statistic and mean-ratio signals
//! - [`PeakOutlierFinder`]: extreme local maxima of a signal, optionally thinned so
//!   that nearby outliers collapse to the strongest
//!
//! ## Example
//!
//! ```rust
//! use scaffold_delink::coverage::{ChangePointDetector, PeakOutlierFinder};
//!
//! let mut depth = vec![10.0; 400];
//! depth[200..].iter_mut().for_each(|d| *d = 40.0);
//!
//! let signals = ChangePointDetector::new(20).detect(&depth);
//! let outliers = PeakOutlierFinder::default().find(&signals.mean_ratio);
//! assert!(outliers.iter().any(|&p| (190..=210).contains(&p)));
//! ```

pub mod changepoint;
pub mod compositor;
pub mod outliers;

pub use changepoint::{ChangePointDetector, ChangePointSignals, Statistic};
pub use compositor::{ContigSummary, CoverageCompositor, CoverageError, CoverageTable, ScaffoldDepth};
pub use outliers::PeakOutlierFinder;
