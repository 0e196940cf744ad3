// probity-core/src/domain/statistics/mod.rs
//
// Pure numeric routines. No state, no I/O.

pub(crate) mod histogram;
pub mod kl;
pub mod ks;
pub mod psi;

pub use kl::kl_divergence;
pub use ks::{KsTest, two_sample_ks};
pub use psi::population_stability_index;

use serde::{Serialize, Serializer};

/// Default number of bins for PSI and KL divergence.
pub const DEFAULT_BUCKETS: usize = 10;

/// Outcome of a binned divergence. `Degenerate` marks input that could not be
/// binned (empty, constant, non-finite); it reads as `0.0` so reports are
/// always produced, but callers can still tell it apart from a computed zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Divergence {
    Computed(f64),
    Degenerate,
}

impl Divergence {
    pub fn value(self) -> f64 {
        match self {
            Self::Computed(v) => v,
            Self::Degenerate => 0.0,
        }
    }

    pub fn is_degenerate(self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

impl Serialize for Divergence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_statistics() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), Some(5.0));
        assert!((sample_std(&data).unwrap_or_default() - 2.138_089_935).abs() < 1e-6);
        assert_eq!(min(&data), Some(2.0));
        assert_eq!(max(&data), Some(9.0));
    }

    #[test]
    fn test_empty_and_single_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(min(&[]), None);
    }

    #[test]
    fn test_degenerate_reads_as_zero() {
        assert_eq!(Divergence::Degenerate.value(), 0.0);
        assert!(Divergence::Degenerate.is_degenerate());
        assert!(!Divergence::Computed(0.0).is_degenerate());
    }
}
