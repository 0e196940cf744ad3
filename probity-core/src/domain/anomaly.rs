// probity-core/src/domain/anomaly.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, ScorerError};
use crate::domain::features::FeatureVector;
use crate::ports::Scorer;

/// Scorer label for an outlier.
pub const ANOMALY_LABEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Normal,
    Anomaly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Raw decision value from the scorer; lower is more anomalous.
    pub anomaly_score: f64,
    pub prediction: Prediction,
    pub severity: Severity,
}

impl AnomalyResult {
    fn from_label(anomaly_score: f64, label: i64) -> Self {
        let (prediction, severity) = if label == ANOMALY_LABEL {
            (Prediction::Anomaly, Severity::High)
        } else {
            (Prediction::Normal, Severity::Normal)
        };
        Self {
            anomaly_score,
            prediction,
            severity,
        }
    }

    pub fn is_anomaly(&self) -> bool {
        self.prediction == Prediction::Anomaly
    }
}

/// Scores one feature vector as a single-row batch.
///
/// The feature schema is not checked here. Whatever the scorer reports
/// (including a schema mismatch) comes back as [`DomainError::Scoring`].
#[instrument(skip_all, fields(features = features.len()))]
pub fn score_anomaly<S: Scorer + ?Sized>(
    scorer: &S,
    features: &FeatureVector,
) -> Result<AnomalyResult, DomainError> {
    let rows = std::slice::from_ref(features);

    let score = first(scorer.decision_function(rows)?)?;
    let label = first(scorer.predict(rows)?)?;

    let result = AnomalyResult::from_label(score, label);
    debug!(score, label, prediction = ?result.prediction, "Scored feature vector");
    Ok(result)
}

fn first<T: Copy>(output: Vec<T>) -> Result<T, ScorerError> {
    output.first().copied().ok_or(ScorerError::EmptyOutput(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedScorer {
        score: f64,
        label: i64,
    }

    impl Scorer for FixedScorer {
        fn decision_function(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ScorerError> {
            Ok(vec![self.score; rows.len()])
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>, ScorerError> {
            Ok(vec![self.label; rows.len()])
        }
    }

    struct SilentScorer;

    impl Scorer for SilentScorer {
        fn decision_function(&self, _rows: &[FeatureVector]) -> Result<Vec<f64>, ScorerError> {
            Ok(Vec::new())
        }

        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<i64>, ScorerError> {
            Ok(Vec::new())
        }
    }

    struct StrictScorer;

    impl Scorer for StrictScorer {
        fn decision_function(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ScorerError> {
            Err(ScorerError::SchemaMismatch {
                expected: "a_mean".into(),
                found: rows[0].names().collect::<Vec<_>>().join(", "),
            })
        }

        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<i64>, ScorerError> {
            Ok(vec![1])
        }
    }

    fn features() -> FeatureVector {
        FeatureVector::from_iter([("row_count", 5.0), ("column_count", 2.0)])
    }

    #[test]
    fn test_negative_label_is_high_severity_anomaly() {
        let scorer = FixedScorer {
            score: -0.12,
            label: -1,
        };
        let result = score_anomaly(&scorer, &features()).unwrap();
        assert_eq!(result.prediction, Prediction::Anomaly);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.anomaly_score, -0.12);
        assert!(result.is_anomaly());
    }

    #[test]
    fn test_any_other_label_is_normal() {
        for label in [1, 0, 7] {
            let scorer = FixedScorer { score: 0.3, label };
            let result = score_anomaly(&scorer, &features()).unwrap();
            assert_eq!(result.prediction, Prediction::Normal);
            assert_eq!(result.severity, Severity::Normal);
        }
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let err = score_anomaly(&SilentScorer, &features()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Scoring(ScorerError::EmptyOutput(1))
        ));
    }

    #[test]
    fn test_scorer_errors_propagate() {
        let err = score_anomaly(&StrictScorer, &features()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Scoring(ScorerError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_works_through_trait_objects() {
        let scorer: Box<dyn Scorer> = Box::new(FixedScorer {
            score: 0.5,
            label: 1,
        });
        let result = score_anomaly(scorer.as_ref(), &features()).unwrap();
        assert_eq!(result.anomaly_score, 0.5);
    }

    #[test]
    fn test_serializes_lowercase() -> anyhow::Result<()> {
        let result = AnomalyResult::from_label(-0.2, -1);
        let json = serde_json::to_value(&result)?;
        assert_eq!(json["prediction"], "anomaly");
        assert_eq!(json["severity"], "high");
        Ok(())
    }
}
