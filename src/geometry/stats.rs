//! Small robust statistics used to normalize layout decisions.
//!
//! Every function tolerates empty or single-sample input. Callers get `None`
//! (or 0 for the standard deviation) rather than an error.

use crate::utils::safe_float_cmp;
use indexmap::IndexMap;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two samples yields 0.0.
///
/// # Examples
///
/// ```
/// use pdf_textflow::geometry::stats::sample_std_dev;
///
/// assert_eq!(sample_std_dev(&[0.5]), 0.0);
/// assert!((sample_std_dev(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
/// ```
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Median; the mean of the two middle values for even-length input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| safe_float_cmp(*a, *b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to the nearest 0.5.
pub fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Most common value after rounding to the nearest 0.5.
///
/// Ties resolve to the value seen first.
///
/// # Examples
///
/// ```
/// use pdf_textflow::geometry::stats::mode_rounded;
///
/// assert_eq!(mode_rounded(&[11.9, 12.1, 12.0, 10.0]), Some(12.0));
/// assert_eq!(mode_rounded(&[]), None);
/// ```
pub fn mode_rounded(values: &[f64]) -> Option<f64> {
    let mut counts: IndexMap<u64, (f64, usize)> = IndexMap::new();
    for &v in values {
        let r = round_half(v);
        counts.entry(r.to_bits()).or_insert((r, 0)).1 += 1;
    }

    let mut best: Option<(f64, usize)> = None;
    for &(value, count) in counts.values() {
        match best {
            Some((_, c)) if c >= count => {},
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_std_dev_underflow_is_zero() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[0.9]), 0.0);
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(sample_std_dev(&[0.95, 0.95, 0.95]), 0.0);
    }

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mode_tie_prefers_first_seen() {
        assert_eq!(mode_rounded(&[10.0, 12.0]), Some(10.0));
        assert_eq!(mode_rounded(&[10.0, 12.0, 12.2]), Some(12.0));
    }

    #[test]
    fn test_round_half() {
        assert_eq!(round_half(11.76), 12.0);
        assert_eq!(round_half(11.6), 11.5);
    }
}
