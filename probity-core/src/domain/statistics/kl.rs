// probity-core/src/domain/statistics/kl.rs

use super::Divergence;
use super::histogram::equal_width_counts;

/// Floor applied to empty density bins.
pub const KL_FLOOR: f64 = 1e-10;

/// KL divergence of `reference` relative to `current`, `D(ref || cur)`.
///
/// Both series are binned into `buckets` equal-width bins over the shared
/// `[min, max]` of their union, turned into densities, floored, normalized
/// and compared. Fewer than two distinct combined values, an empty side or
/// zero buckets give [`Divergence::Degenerate`].
pub fn kl_divergence(reference: &[f64], current: &[f64], buckets: usize) -> Divergence {
    if reference.is_empty() || current.is_empty() || buckets == 0 {
        return Divergence::Degenerate;
    }
    if reference.iter().chain(current).any(|v| !v.is_finite()) {
        return Divergence::Degenerate;
    }

    let combined = reference.iter().chain(current).copied();
    let lo = combined.clone().fold(f64::INFINITY, f64::min);
    let hi = combined.fold(f64::NEG_INFINITY, f64::max);
    if lo >= hi {
        return Divergence::Degenerate;
    }

    let width = (hi - lo) / buckets as f64;
    let p = normalize(&densities(&equal_width_counts(reference, lo, hi, buckets), width));
    let q = normalize(&densities(&equal_width_counts(current, lo, hi, buckets), width));

    let kl = p
        .iter()
        .zip(&q)
        .map(|(pi, qi)| pi * (pi / qi).ln())
        .sum();

    Divergence::Computed(kl)
}

fn densities(counts: &[usize], width: f64) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    counts
        .iter()
        .map(|&c| {
            let density = c as f64 / (total as f64 * width);
            if density == 0.0 { KL_FLOOR } else { density }
        })
        .collect()
}

fn normalize(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    values.iter().map(|v| v / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_equal_inputs_are_degenerate() {
        let kl = kl_divergence(&[2.0, 2.0, 2.0], &[2.0, 2.0], 10);
        assert_eq!(kl, Divergence::Degenerate);
        assert_eq!(kl.value(), 0.0);
    }

    #[test]
    fn test_identical_distributions_have_zero_divergence() {
        let data = [1.0, 2.0, 2.0, 3.0, 4.0, 4.0, 4.0, 5.0];
        let kl = kl_divergence(&data, &data, 10);
        assert!(matches!(kl, Divergence::Computed(v) if v.abs() < 1e-12));
    }

    #[test]
    fn test_divergence_is_asymmetric_and_positive() {
        let reference = [1.0, 1.1, 1.2, 1.3, 1.4];
        let current = [1.0, 1.1, 1.2, 1.3, 2.5];
        let forward = kl_divergence(&reference, &current, 10).value();
        let backward = kl_divergence(&current, &reference, 10).value();
        assert!(forward > 0.0);
        assert!(backward > 0.0);
        assert!((forward - backward).abs() > 1e-6);
    }

    #[test]
    fn test_empty_side_is_degenerate() {
        assert!(kl_divergence(&[], &[1.0, 2.0], 10).is_degenerate());
        assert!(kl_divergence(&[1.0, 2.0], &[1.0], 0).is_degenerate());
    }
}
