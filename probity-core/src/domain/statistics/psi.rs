// probity-core/src/domain/statistics/psi.rs

use super::Divergence;
use super::histogram::{bin_counts, percentile_edges};

/// Floor applied to empty bins before taking ratios and logarithms.
pub const PSI_FLOOR: f64 = 0.0001;

/// Population Stability Index of `actual` against `expected`.
///
/// `expected` alone defines the equal-frequency bins (its percentiles), so the
/// statistic is not symmetric. Bin shares are taken over the full length of
/// each series; values of `actual` outside the expected range fall in no bin.
/// The sum is `(expected - actual) * ln(actual / expected)` per bin.
///
/// Returns [`Divergence::Degenerate`] when either side is empty, `buckets` is
/// zero, a value is not finite, or `expected` is constant.
pub fn population_stability_index(expected: &[f64], actual: &[f64], buckets: usize) -> Divergence {
    if expected.is_empty() || actual.is_empty() || buckets == 0 {
        return Divergence::Degenerate;
    }
    if expected.iter().chain(actual).any(|v| !v.is_finite()) {
        return Divergence::Degenerate;
    }

    let edges = percentile_edges(expected, buckets);
    if edges.first() >= edges.last() {
        return Divergence::Degenerate;
    }

    let expected_pct = shares(&bin_counts(expected, &edges), expected.len());
    let actual_pct = shares(&bin_counts(actual, &edges), actual.len());

    let psi = expected_pct
        .iter()
        .zip(&actual_pct)
        .map(|(e, a)| (e - a) * (a / e).ln())
        .sum();

    Divergence::Computed(psi)
}

fn shares(counts: &[usize], total: usize) -> Vec<f64> {
    counts
        .iter()
        .map(|&c| {
            let share = c as f64 / total as f64;
            if share == 0.0 { PSI_FLOOR } else { share }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psi_identical_series_is_zero() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let psi = population_stability_index(&data, &data, 10);
        assert!(!psi.is_degenerate());
        assert!(psi.value().abs() < 1e-12);
    }

    #[test]
    fn test_psi_constant_expected_is_degenerate() {
        let psi = population_stability_index(&[3.0; 20], &[1.0, 2.0, 3.0], 10);
        assert_eq!(psi, Divergence::Degenerate);
        assert_eq!(psi.value(), 0.0);
    }

    #[test]
    fn test_psi_empty_or_zero_buckets_is_degenerate() {
        assert!(population_stability_index(&[], &[1.0], 10).is_degenerate());
        assert!(population_stability_index(&[1.0, 2.0], &[], 10).is_degenerate());
        assert!(population_stability_index(&[1.0, 2.0], &[1.0], 0).is_degenerate());
        assert!(population_stability_index(&[1.0, f64::INFINITY], &[1.0], 10).is_degenerate());
    }

    #[test]
    fn test_psi_out_of_range_tail() {
        // The 1.4 bin of the reference is empty in the current series,
        // the 2.5 value lies past the last breakpoint.
        let expected = [1.0, 1.1, 1.2, 1.3, 1.4];
        let actual = [1.0, 1.1, 1.2, 1.3, 2.5];
        let psi = population_stability_index(&expected, &actual, 10).value();
        let want = (0.2 - PSI_FLOOR) * (PSI_FLOOR / 0.2).ln();
        assert!((psi - want).abs() < 1e-9, "psi = {psi}, want {want}");
    }

    #[test]
    fn test_psi_sign_follows_expected_minus_actual() {
        // Each bin term (e - a) * ln(a / e) is never positive.
        let expected: Vec<f64> = (0..100).map(f64::from).collect();
        let actual: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.5).collect();
        assert!(population_stability_index(&expected, &actual, 10).value() < 0.0);
    }
}
