use std::collections::BTreeSet;

use tracing::debug;

use crate::utils::count_to_f64;

/// Default percentile for flagging extreme peaks
pub const DEFAULT_PEAK_PERCENTILE: f64 = 99.0;

/// Default distance within which neighboring outliers are collapsed
pub const DEFAULT_NEIGHBOR_WINDOW: usize = 100;

/// Percentile of `values` with linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = count_to_f64(sorted.len() - 1) * (q / 100.0).clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let fraction = rank - rank.floor();
    let value = match sorted.get(lower + 1) {
        Some(&next) => sorted[lower] + (next - sorted[lower]) * fraction,
        None => sorted[lower],
    };
    Some(value)
}

/// Indices whose value is at or above the `thresh` percentile, or at or below the
/// `100 - thresh` percentile
#[must_use]
pub fn find_outliers(signal: &[f64], thresh: f64) -> Vec<usize> {
    let (Some(upper), Some(lower)) = (percentile(signal, thresh), percentile(signal, 100.0 - thresh))
    else {
        return Vec::new();
    };
    signal
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= upper || v <= lower)
        .map(|(i, _)| i)
        .collect()
}

/// Positive local maxima of `signal`, in ascending order.
///
/// A position other than the first or last is a peak if it is no smaller than
/// either neighbor.
#[must_use]
pub fn find_peaks(signal: &[f64]) -> Vec<usize> {
    if signal.len() < 3 {
        return Vec::new();
    }
    (1..signal.len() - 1)
        .filter(|&i| signal[i] > 0.0 && signal[i] >= signal[i - 1] && signal[i] >= signal[i + 1])
        .collect()
}

/// Peaks whose height is extreme among all peak heights.
///
/// Outliers are taken over peaks rather than the raw signal so that the shoulders
/// of a sliding-window response are not reported next to its summit.
#[must_use]
pub fn find_peak_outliers(signal: &[f64], thresh: f64) -> Vec<usize> {
    let peaks = find_peaks(signal);
    let heights: Vec<f64> = peaks.iter().map(|&i| signal[i]).collect();
    find_outliers(&heights, thresh)
        .into_iter()
        .map(|i| peaks[i])
        .collect()
}

/// Collapse runs of outliers closer than `window` to the strongest one.
///
/// `outliers` must be sorted ascending. The sweep keeps a current representative
/// and replaces it with any later outlier within `window` whose signal is at least
/// as large; outliers further away start a new run. This is a greedy pass and does
/// not guarantee an optimal clustering.
#[must_use]
pub fn filter_neighbors(outliers: &[usize], signal: &[f64], window: usize) -> Vec<usize> {
    let Some((&first, rest)) = outliers.split_first() else {
        return Vec::new();
    };

    let mut current = first;
    let mut kept = BTreeSet::from([current]);
    for &candidate in rest {
        if candidate.saturating_sub(current) <= window {
            if signal[candidate] >= signal[current] {
                kept.remove(&current);
                kept.insert(candidate);
                current = candidate;
            }
        } else {
            kept.insert(candidate);
            current = candidate;
        }
    }

    kept.into_iter().collect()
}

/// Finds candidate mis-join positions in a change-point signal
#[derive(Debug, Clone, Copy)]
pub struct PeakOutlierFinder {
    pub percentile: f64,
    pub neighbor_window: usize,
    pub filter_neighbors: bool,
}

impl Default for PeakOutlierFinder {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PEAK_PERCENTILE,
            neighbor_window: DEFAULT_NEIGHBOR_WINDOW,
            filter_neighbors: true,
        }
    }
}

impl PeakOutlierFinder {
    pub fn find(&self, signal: &[f64]) -> Vec<usize> {
        let peaks = find_peak_outliers(signal, self.percentile);
        if !self.filter_neighbors {
            return peaks;
        }
        let filtered = filter_neighbors(&peaks, signal, self.neighbor_window);
        debug!(
            "{} outlier peaks, {} after neighbor filtering",
            peaks.len(),
            filtered.len()
        );
        filtered
    }
}
