// probity-core/src/application/pipeline.rs

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::ProbityError;
use crate::ports::{AlertSink, Explainer, NoExplainer, Scorer};

// Domain
use crate::domain::alert::{Alert, anomaly_alert};
use crate::domain::anomaly::{AnomalyResult, score_anomaly};
use crate::domain::configuration::AnalyticsConfig;
use crate::domain::dataset::{DataKind, Dataset};
use crate::domain::drift::{DriftReport, detect_drift_with};
use crate::domain::explain::{FeatureImpact, explain_anomaly};
use crate::domain::features::{FeatureVector, generate_features};
use crate::domain::quality::{QualityReport, run_data_quality_checks};

/// Result of [`Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub data_type: DataKind,
    pub quality_report: QualityReport,
    pub features: FeatureVector,
    pub anomaly: AnomalyResult,
    /// Top feature impacts, only for anomalies when an explainer is set up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<FeatureImpact>>,
    /// Alert raised for an anomaly, when alerting is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
}

impl AnalysisOutcome {
    pub fn is_anomaly(&self) -> bool {
        self.anomaly.is_anomaly()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Profile -> features -> score -> explain -> alert, for one dataset at a
/// time, plus drift comparison between two datasets.
///
/// Built once around a shared scorer handle; `analyze` and `compare` only
/// take `&self`, so one analyzer can serve concurrent callers.
pub struct Analyzer<S: ?Sized, E = NoExplainer> {
    scorer: Arc<S>,
    explainer: Option<E>,
    alert_sink: Option<Arc<dyn AlertSink>>,
    config: AnalyticsConfig,
}

impl<S: Scorer + ?Sized> Analyzer<S, NoExplainer> {
    pub fn new(scorer: Arc<S>, config: AnalyticsConfig) -> Self {
        Self {
            scorer,
            explainer: None,
            alert_sink: None,
            config,
        }
    }
}

impl<S: Scorer + ?Sized, E: Explainer<S>> Analyzer<S, E> {
    pub fn with_explainer<X: Explainer<S>>(self, explainer: X) -> Analyzer<S, X> {
        Analyzer {
            scorer: self.scorer,
            explainer: Some(explainer),
            alert_sink: self.alert_sink,
            config: self.config,
        }
    }

    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Arc<S> {
        &self.scorer
    }

    #[instrument(skip_all, fields(rows = dataset.row_count(), columns = dataset.column_count()))]
    pub fn analyze(&self, dataset: &Dataset) -> Result<AnalysisOutcome, ProbityError> {
        // 1. Profile (classification happens once, here)
        let assessment = run_data_quality_checks(dataset);
        let data_type = assessment.data_type;

        // 2. Features for the same kind
        let features = generate_features(dataset, data_type);

        // 3. Score
        let anomaly = score_anomaly(self.scorer.as_ref(), &features)?;

        // 4. Explain
        let explanation = match &self.explainer {
            Some(explainer) if anomaly.is_anomaly() && self.config.explanation.enabled => {
                Some(explain_anomaly(
                    explainer,
                    self.scorer.as_ref(),
                    &features,
                    self.config.explanation.top_k,
                )?)
            }
            _ => None,
        };

        // 5. Alert
        let alert = if self.config.alerting.enabled {
            anomaly_alert(&anomaly, &self.config.alerting.context)
        } else {
            None
        };
        if let Some(alert) = &alert {
            self.deliver(alert);
        }

        info!(
            %data_type,
            prediction = ?anomaly.prediction,
            score = anomaly.anomaly_score,
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            data_type,
            quality_report: assessment.quality_report,
            features,
            anomaly,
            explanation,
            alert,
        })
    }

    /// Drift of `current` against `reference` under the configured policy.
    #[instrument(skip_all, fields(reference_rows = reference.row_count(), current_rows = current.row_count()))]
    pub fn compare(&self, reference: &Dataset, current: &Dataset) -> DriftReport {
        let report = detect_drift_with(reference, current, &self.config.drift);
        info!(
            columns_analyzed = report.columns_analyzed,
            drifted_columns = report.drifted_columns,
            "Drift comparison complete"
        );
        report
    }

    // Delivery problems are logged; the analysis result stands regardless.
    fn deliver(&self, alert: &Alert) {
        let Some(sink) = &self.alert_sink else {
            return;
        };
        if let Err(e) = sink.send(alert) {
            warn!(error = %e, title = %alert.title, "Alert delivery failed");
        }
    }
}
