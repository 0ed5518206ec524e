//! Centralized validation and helper functions for graph attributes.

use serde_json::Value;

/// Maximum number of contigs allowed in a single graph (DOS protection)
pub const MAX_CONTIGS: usize = 5_000_000;

/// Maximum contig length accepted from a graph file
pub const MAX_CONTIG_LENGTH: u64 = 1 << 40;

/// Interpret a JSON attribute as a number, accepting numeric strings.
///
/// # Examples
///
/// ```
/// use scaffold_delink::utils::validation::parse_number;
/// use serde_json::json;
///
/// assert_eq!(parse_number(&json!(12.5)), Some(12.5));
/// assert_eq!(parse_number(&json!("-3.25")), Some(-3.25));
/// assert_eq!(parse_number(&json!("abc")), None);
/// ```
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Interpret a JSON attribute as a contig length.
///
/// Lengths may be integers, integral floats or their string forms
/// (`100`, `100.0`, `"100"`). Negative, fractional and oversized values are rejected.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_length(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return (n <= MAX_CONTIG_LENGTH).then_some(n);
    }
    if let Value::String(s) = value {
        if let Ok(n) = s.trim().parse::<u64>() {
            return (n <= MAX_CONTIG_LENGTH).then_some(n);
        }
    }
    let number = parse_number(value)?;
    if number >= 0.0 && number.fract() == 0.0 && number <= MAX_CONTIG_LENGTH as f64 {
        Some(number as u64)
    } else {
        None
    }
}

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&json!(3)), Some(3.0));
        assert_eq!(parse_number(&json!(" 7.5 ")), Some(7.5));
        assert_eq!(parse_number(&json!("nan")), None);
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!([1])), None);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(&json!(1500)), Some(1500));
        assert_eq!(parse_length(&json!("1500")), Some(1500));
        assert_eq!(parse_length(&json!("1500.0")), Some(1500));
        assert_eq!(parse_length(&json!(1500.0)), Some(1500));
        assert_eq!(parse_length(&json!(-5)), None);
        assert_eq!(parse_length(&json!("12.5")), None);
        assert_eq!(parse_length(&json!(MAX_CONTIG_LENGTH + 1)), None);
    }

    #[test]
    fn test_check_contig_limit() {
        assert!(check_contig_limit(0).is_none());
        assert!(check_contig_limit(MAX_CONTIGS - 1).is_none());
        assert!(check_contig_limit(MAX_CONTIGS).is_some());
    }
}
