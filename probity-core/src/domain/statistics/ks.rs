// probity-core/src/domain/statistics/ks.rs

use serde::{Deserialize, Serialize};

use super::histogram::sorted;

/// Above this many lattice cells (`n1 * n2`) the p-value switches from the
/// exact path count to the asymptotic Kolmogorov distribution.
const EXACT_CELL_LIMIT: usize = 10_000_000;

/// Two-sample Kolmogorov–Smirnov result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsTest {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sided two-sample KS test.
///
/// The statistic is the largest gap between the two empirical CDFs. Empty
/// input yields `{statistic: 0, p_value: 1}`.
pub fn two_sample_ks(reference: &[f64], current: &[f64]) -> KsTest {
    if reference.is_empty() || current.is_empty() {
        return KsTest {
            statistic: 0.0,
            p_value: 1.0,
        };
    }

    let a = sorted(reference);
    let b = sorted(current);
    let statistic = ecdf_distance(&a, &b);

    let (n1, n2) = (a.len(), b.len());
    let p_value = if n1.saturating_mul(n2) <= EXACT_CELL_LIMIT {
        exact_p_value(n1, n2, statistic)
    } else {
        asymptotic_p_value(n1, n2, statistic)
    };

    KsTest {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    }
}

/// Walks both sorted samples, advancing past ties together.
fn ecdf_distance(a: &[f64], b: &[f64]) -> f64 {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;

    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d
}

/// P(D >= d) under the null, from the probability that a uniformly random
/// monotone lattice path from (0,0) to (n1,n2) stays strictly inside the band
/// `|i/n1 - j/n2| < d`. Integer arithmetic on `i*n2 - j*n1` keeps the band
/// test exact.
fn exact_p_value(n1: usize, n2: usize, d: f64) -> f64 {
    let h = (d * n1 as f64 * n2 as f64).round() as i128;
    if h <= 0 {
        return 1.0;
    }
    let inside = |i: usize, j: usize| ((i * n2) as i128 - (j * n1) as i128).abs() < h;

    // row[j] holds the probability of reaching (i, j) without leaving the band
    let mut row = vec![0.0f64; n2 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            let reach = if i == 0 && j == 0 {
                1.0
            } else {
                let from_below = if i > 0 {
                    let left_i = (n1 - i + 1) as f64;
                    row[j] * left_i / (left_i + (n2 - j) as f64)
                } else {
                    0.0
                };
                let from_left = if j > 0 {
                    let left_j = (n2 - j + 1) as f64;
                    row[j - 1] * left_j / ((n1 - i) as f64 + left_j)
                } else {
                    0.0
                };
                from_below + from_left
            };
            row[j] = if inside(i, j) { reach } else { 0.0 };
        }
    }

    1.0 - row[n2]
}

/// Limiting Kolmogorov distribution with the Stephens small-sample correction.
fn asymptotic_p_value(n1: usize, n2: usize, d: f64) -> f64 {
    let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
    kolmogorov_sf((en + 0.12 + 0.11 / en) * d)
}

/// Survival function of the Kolmogorov distribution, Q(λ) = P(K > λ).
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 1.18 {
        // Jacobi theta form converges fast for small λ
        let w = std::f64::consts::PI.powi(2) / (8.0 * lambda * lambda);
        let cdf: f64 = (1..=20)
            .map(|k| {
                let odd = (2 * k - 1) as f64;
                (-odd * odd * w).exp()
            })
            .sum::<f64>()
            * (2.0 * std::f64::consts::PI).sqrt()
            / lambda;
        return 1.0 - cdf;
    }

    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = (-2.0 * (k * k) as f64 * lambda * lambda).exp();
        sum += sign * term;
        if term < 1e-16 {
            break;
        }
        sign = -sign;
    }
    2.0 * sum
}
