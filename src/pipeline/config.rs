use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coverage::changepoint::{Statistic, DEFAULT_WINDOW_SIZE};
use crate::coverage::outliers::{DEFAULT_NEIGHBOR_WINDOW, DEFAULT_PEAK_PERCENTILE};
use crate::delink::plan::DEFAULT_POS_CUTOFF;
use crate::layout::cycles::DEFAULT_MAX_CYCLES;
use crate::pipeline::engine::PipelineError;

/// Tuning parameters for the per-scaffold pipeline.
///
/// Missing fields in a JSON config file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sliding window length for change-point statistics
    pub window_size: usize,

    /// Percentile above which a peak is an outlier (the lower tail uses `100 - p`)
    pub peak_percentile: f64,

    /// Outliers this close together are collapsed to the strongest
    pub neighbor_window: usize,

    pub filter_neighbors: bool,

    /// Maximum distance between an outlier and the contig boundary it implicates
    pub pos_cutoff: u64,

    /// Signal driving outlier detection
    pub statistic: Statistic,

    /// Cap on simple cycles enumerated per component
    pub max_cycles: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            peak_percentile: DEFAULT_PEAK_PERCENTILE,
            neighbor_window: DEFAULT_NEIGHBOR_WINDOW,
            filter_neighbors: true,
            pos_cutoff: DEFAULT_POS_CUTOFF,
            statistic: Statistic::default(),
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or fails
    /// [`PipelineConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| PipelineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.peak_percentile > 50.0 && self.peak_percentile <= 100.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "peak_percentile must be in (50, 100], got {}",
                self.peak_percentile
            )));
        }
        if self.window_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.max_cycles == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_cycles must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
