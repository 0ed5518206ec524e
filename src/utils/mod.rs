//! Shared helpers.

pub mod validation;

/// Safely convert usize to f64 for averaging
///
/// Counts in this crate (bases, window sizes, peaks) stay far below 2^53, so
/// the conversion is exact in practice.
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}
