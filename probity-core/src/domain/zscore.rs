// probity-core/src/domain/zscore.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error::{ExplainerError, ScorerError};
use crate::domain::features::FeatureVector;
use crate::ports::{Explainer, Scorer};

/// Classic 3-sigma cut-off.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Observations needed before the variance means anything.
const MIN_HISTORY: u64 = 2;

/// Standard deviations below this are treated as zero (constant feature).
const STDDEV_EPSILON: f64 = 1e-9;

/// Rolling mean/variance of one feature.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MetricState {
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    pub count: u64,
}

impl MetricState {
    /// Welford's online update.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.variance = 0.0;
            return;
        }
        let old_mean = self.mean;
        self.mean += (value - old_mean) / self.count as f64;
        // M2_new = M2_old + (x - old_mean) * (x - new_mean)
        let prev_m2 = self.variance * (self.count - 1) as f64;
        let new_m2 = prev_m2 + (value - old_mean) * (value - self.mean);
        self.variance = new_m2 / self.count as f64;
    }

    pub fn stddev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Signed z-score, 0.0 when the feature has not varied so far.
    pub fn z_score(&self, value: f64) -> f64 {
        let stddev = self.stddev();
        if stddev > STDDEV_EPSILON {
            (value - self.mean) / stddev
        } else {
            0.0
        }
    }
}

/// Anomaly scorer built from the history of previously seen feature vectors.
///
/// Every feature keeps a rolling mean and variance. A vector is an outlier
/// when any feature lies more than `threshold` standard deviations from its
/// mean. The decision value is `threshold - max|z|`, so it is negative exactly
/// for outliers, as with the usual `decision_function` convention.
///
/// The baseline is mutated through `&mut self` while it is being built, then
/// shared read-only (typically behind an `Arc`) for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineScorer {
    threshold: f64,
    schema: Vec<String>,
    states: Vec<MetricState>,
}

impl Default for BaselineScorer {
    fn default() -> Self {
        Self::new(DEFAULT_Z_THRESHOLD)
    }
}

impl BaselineScorer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            schema: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Baseline over a batch of normal vectors.
    pub fn fit(threshold: f64, rows: &[FeatureVector]) -> Result<Self, ScorerError> {
        let mut scorer = Self::new(threshold);
        for row in rows {
            scorer.observe(row)?;
        }
        Ok(scorer)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of vectors folded into the baseline.
    pub fn observations(&self) -> u64 {
        self.states.first().map_or(0, |s| s.count)
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn state(&self, feature: &str) -> Option<&MetricState> {
        self.schema
            .iter()
            .position(|name| name == feature)
            .and_then(|idx| self.states.get(idx))
    }

    /// Folds a vector into the baseline. The first vector fixes the schema.
    pub fn observe(&mut self, features: &FeatureVector) -> Result<(), ScorerError> {
        if self.schema.is_empty() {
            self.schema = features.names().map(str::to_string).collect();
            self.states = vec![MetricState::default(); self.schema.len()];
        } else {
            self.check_schema(features)?;
        }
        for (state, value) in self.states.iter_mut().zip(features.values()) {
            state.update(value);
        }
        Ok(())
    }

    /// Folds the vector in only if it is not an outlier, so anomalies never
    /// shift the baseline. Vectors seen before there is enough history are
    /// always accepted. Returns whether the vector was ingested.
    pub fn observe_if_normal(&mut self, features: &FeatureVector) -> Result<bool, ScorerError> {
        if self.observations() >= MIN_HISTORY {
            let deviation = self.max_abs_z(features)?;
            if deviation > self.threshold {
                debug!(deviation, threshold = self.threshold, "Outlier kept out of baseline");
                return Ok(false);
            }
        }
        self.observe(features)?;
        Ok(true)
    }

    /// Signed z-score of every feature, in schema order.
    pub fn z_scores(&self, features: &FeatureVector) -> Result<Vec<(String, f64)>, ScorerError> {
        self.check_history()?;
        self.check_schema(features)?;
        Ok(self
            .schema
            .iter()
            .zip(&self.states)
            .zip(features.values())
            .map(|((name, state), value)| (name.clone(), state.z_score(value)))
            .collect())
    }

    pub fn max_abs_z(&self, features: &FeatureVector) -> Result<f64, ScorerError> {
        Ok(self
            .z_scores(features)?
            .into_iter()
            .map(|(_, z)| z.abs())
            .fold(0.0, f64::max))
    }

    fn check_history(&self) -> Result<(), ScorerError> {
        let available = self.observations();
        if available < MIN_HISTORY {
            return Err(ScorerError::NotEnoughHistory {
                required: MIN_HISTORY,
                available,
            });
        }
        Ok(())
    }

    fn check_schema(&self, features: &FeatureVector) -> Result<(), ScorerError> {
        if features.names().eq(self.schema.iter().map(String::as_str)) {
            return Ok(());
        }
        Err(ScorerError::SchemaMismatch {
            expected: self.schema.join(", "),
            found: features.names().collect::<Vec<_>>().join(", "),
        })
    }
}

impl Scorer for BaselineScorer {
    fn decision_function(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ScorerError> {
        rows.iter()
            .map(|row| Ok(self.threshold - self.max_abs_z(row)?))
            .collect()
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>, ScorerError> {
        rows.iter()
            .map(|row| {
                let outlier = self.max_abs_z(row)? > self.threshold;
                Ok(if outlier { -1 } else { 1 })
            })
            .collect()
    }
}

/// Attributes each feature's signed z-score against the baseline as its
/// impact.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviationExplainer;

impl Explainer<BaselineScorer> for DeviationExplainer {
    fn attributions(
        &self,
        scorer: &BaselineScorer,
        features: &FeatureVector,
    ) -> Result<Vec<(String, f64)>, ExplainerError> {
        scorer
            .z_scores(features)
            .map_err(|e| ExplainerError::Backend(e.to_string()))
    }
}
