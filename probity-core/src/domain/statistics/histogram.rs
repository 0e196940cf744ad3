// probity-core/src/domain/statistics/histogram.rs
//
// Binning helpers shared by PSI and KL divergence.

use std::cmp::Ordering;

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Percentile of already-sorted data with linear interpolation between ranks.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// `buckets + 1` breakpoints at the 0th, 100/buckets-th, ..., 100th percentiles.
pub(crate) fn percentile_edges(values: &[f64], buckets: usize) -> Vec<f64> {
    let sorted = sorted(values);
    (0..=buckets)
        .map(|i| percentile(&sorted, i as f64 * 100.0 / buckets as f64))
        .collect()
}

/// `buckets + 1` evenly spaced breakpoints spanning `[lo, hi]`.
pub(crate) fn linear_edges(lo: f64, hi: f64, buckets: usize) -> Vec<f64> {
    let step = (hi - lo) / buckets as f64;
    (0..=buckets)
        .map(|i| if i == buckets { hi } else { lo + step * i as f64 })
        .collect()
}

/// Counts per bin for arbitrary non-decreasing edges. Bins are half-open
/// `[e_i, e_i+1)` except the last, which is closed. Values outside
/// `[first, last]` are dropped. A zero-width bin never receives values.
pub(crate) fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let buckets = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; buckets];
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return counts;
    };

    for &v in values {
        if !(first..=last).contains(&v) {
            continue;
        }
        let idx = if v == last {
            buckets - 1
        } else {
            // number of edges <= v, minus one
            edges.partition_point(|&e| e <= v) - 1
        };
        counts[idx] += 1;
    }
    counts
}

/// Counts per bin for `buckets` equal-width bins over `[lo, hi]`.
pub(crate) fn equal_width_counts(values: &[f64], lo: f64, hi: f64, buckets: usize) -> Vec<usize> {
    bin_counts(values, &linear_edges(lo, hi, buckets))
}
