// probity-core/src/ports/scorer.rs

// What the engine needs from an anomaly model, without knowing what the model is
// (isolation forest, autoencoder, rolling baseline...).

use crate::domain::error::ScorerError;
use crate::domain::features::FeatureVector;

/// A fitted anomaly model. Each input row is a feature vector; the feature
/// names are the table's columns.
///
/// Rows must carry exactly the schema the model was fitted on. The engine
/// does not check this; implementations may reject mismatches with
/// [`ScorerError::SchemaMismatch`].
///
/// The handle is shared read-only across callers once built.
pub trait Scorer: Send + Sync {
    /// One confidence value per row. Lower means more anomalous.
    fn decision_function(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ScorerError>;

    /// One label per row, `-1` for anomalies.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>, ScorerError>;
}
