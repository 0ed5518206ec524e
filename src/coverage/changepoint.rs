use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::count_to_f64;

/// Default sliding window length in bases
pub const DEFAULT_WINDOW_SIZE: usize = 1500;

/// Which change-point signal to use for outlier detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// max/min ratio of the means of the preceding and succeeding windows
    #[default]
    MeanRatio,
    /// Two-sample z-statistic of the preceding and succeeding windows
    ZScore,
}

/// Both change-point signals, aligned with the depth profile they were computed from
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePointSignals {
    pub z_score: Vec<f64>,
    pub mean_ratio: Vec<f64>,
    /// Window length actually used after adapting to the signal length
    pub window_size: usize,
}

impl ChangePointSignals {
    pub fn get(&self, statistic: Statistic) -> &[f64] {
        match statistic {
            Statistic::MeanRatio => &self.mean_ratio,
            Statistic::ZScore => &self.z_score,
        }
    }
}

/// Rolling mean and sample standard deviation of every full window
struct RollingStats {
    means: Vec<f64>,
    sds: Vec<f64>,
}

impl RollingStats {
    fn compute(values: &[f64], window: usize) -> Self {
        let count = values.len() + 1 - window;
        let w = count_to_f64(window);
        // Sums are taken around the first value to limit cancellation
        let shift = values[0];
        let mut sum: f64 = values[..window].iter().map(|v| v - shift).sum();
        let mut sum_sq: f64 = values[..window].iter().map(|v| (v - shift).powi(2)).sum();

        let mut means = Vec::with_capacity(count);
        let mut sds = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                let out = values[i - 1] - shift;
                let inc = values[i + window - 1] - shift;
                sum += inc - out;
                sum_sq += inc * inc - out * out;
            }
            let mean = sum / w;
            means.push(mean + shift);
            let var = if window > 1 {
                let var = (sum_sq - sum * mean) / (w - 1.0);
                // Round-off scales with the shifted squares, not the raw depth
                if var < 1e-12 * sum_sq.abs() / (w - 1.0) {
                    0.0
                } else {
                    var
                }
            } else {
                f64::NAN
            };
            sds.push(var.sqrt());
        }
        Self { means, sds }
    }
}

/// Sliding-window change-point statistics over a scaffold depth profile.
///
/// Zero-depth positions are gaps: they are dropped before windowing and read as 0
/// in the output. Each remaining position is compared against the window of `w`
/// values before it and the window of `w` values after it; the first and last `w`
/// positions have no full windows and read as 0. The window shrinks by a factor of
/// 5 until it is shorter than half the non-zero positions.
#[derive(Debug, Clone, Copy)]
pub struct ChangePointDetector {
    window_size: usize,
}

impl Default for ChangePointDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ChangePointDetector {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Window length used for a signal with `covered` non-zero positions
    pub fn effective_window(&self, covered: usize) -> usize {
        let mut window = self.window_size;
        while window > 0 && 2 * window >= covered {
            window /= 5;
        }
        window
    }

    /// Compute both signals
    pub fn detect(&self, depth: &[f64]) -> ChangePointSignals {
        let (positions, values) = split_nonzero(depth);
        let window = self.effective_window(values.len());
        debug!(
            "{} covered positions of {}, window {}",
            values.len(),
            depth.len(),
            window
        );

        let (z_score, mean_ratio) = if window == 0 {
            (vec![0.0; values.len()], vec![0.0; values.len()])
        } else {
            let stats = RollingStats::compute(&values, window);
            let z = compare_windows(&stats, window, |pre, suc| {
                (pre.0 - suc.0) / (pre.1.powi(2) + suc.1.powi(2)).sqrt()
            });
            let ratio = compare_windows(&stats, window, |pre, suc| {
                pre.0.max(suc.0) / pre.0.min(suc.0)
            });
            (z, ratio)
        };

        ChangePointSignals {
            z_score: scatter(depth.len(), &positions, &z_score),
            mean_ratio: scatter(depth.len(), &positions, &mean_ratio),
            window_size: window,
        }
    }

    /// Two-sample z-statistic `(mu_pre - mu_suc) / sqrt(sd_pre^2 + sd_suc^2)`
    pub fn z_statistic(&self, depth: &[f64]) -> Vec<f64> {
        self.detect(depth).z_score
    }

    /// `max(mu_pre, mu_suc) / min(mu_pre, mu_suc)`
    pub fn mean_ratio(&self, depth: &[f64]) -> Vec<f64> {
        self.detect(depth).mean_ratio
    }
}

fn split_nonzero(depth: &[f64]) -> (Vec<usize>, Vec<f64>) {
    depth
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0.0)
        .map(|(i, &v)| (i, v))
        .unzip()
}

/// Apply `stat` to every (preceding, succeeding) window pair and pad with `window`
/// zeros on each side. Non-finite results become 0.
fn compare_windows<F>(stats: &RollingStats, window: usize, stat: F) -> Vec<f64>
where
    F: Fn((f64, f64), (f64, f64)) -> f64,
{
    let pairs = stats.means.len() - window - 1;
    let mut out = vec![0.0; window];
    out.extend((0..pairs).map(|i| {
        let pre = (stats.means[i], stats.sds[i]);
        let suc = (stats.means[i + window + 1], stats.sds[i + window + 1]);
        let value = stat(pre, suc);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }));
    out.extend(std::iter::repeat(0.0).take(window));
    out
}

fn scatter(len: usize, positions: &[usize], values: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; len];
    for (&p, &v) in positions.iter().zip(values) {
        out[p] = v;
    }
    out
}
