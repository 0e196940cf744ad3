// probity-core/src/domain/alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::domain::anomaly::AnomalyResult;

pub const DEFAULT_ALERT_CONTEXT: &str = "Batch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub level: AlertLevel,
    /// What was being analyzed ("Batch", a table name, a log stream...)
    pub context: String,
    pub raised_at: DateTime<Utc>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl Alert {
    pub fn new(
        level: AlertLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
            context: context.into(),
            raised_at: Utc::now(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.message)
    }
}

/// A critical alert for an anomalous result, nothing for a normal one.
pub fn anomaly_alert(result: &AnomalyResult, context: &str) -> Option<Alert> {
    if !result.is_anomaly() {
        return None;
    }
    let alert = Alert::new(
        AlertLevel::Critical,
        format!("Anomaly Detected in {context}"),
        "Model detected anomalous data pattern.",
        context,
    )
    .with_detail("anomaly_score", json!(result.anomaly_score))
    .with_detail("severity", json!(result.severity));
    Some(alert)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::anomaly::{Prediction, Severity};

    fn result(prediction: Prediction, severity: Severity) -> AnomalyResult {
        AnomalyResult {
            anomaly_score: -0.31,
            prediction,
            severity,
        }
    }

    #[test]
    fn test_anomaly_raises_critical_alert() {
        let alert = anomaly_alert(&result(Prediction::Anomaly, Severity::High), "orders").unwrap();
        assert_eq!(alert.level, AlertLevel::Critical);
        assert_eq!(alert.title, "Anomaly Detected in orders");
        assert_eq!(alert.context, "orders");
        assert_eq!(alert.details["anomaly_score"], json!(-0.31));
        assert_eq!(alert.details["severity"], json!("high"));
    }

    #[test]
    fn test_normal_result_raises_nothing() {
        assert!(anomaly_alert(&result(Prediction::Normal, Severity::Normal), "Batch").is_none());
    }

    #[test]
    fn test_display_and_ordering() {
        let alert = Alert::new(AlertLevel::Warning, "Drift", "2 columns drifted", "orders");
        assert_eq!(alert.to_string(), "[WARNING] Drift: 2 columns drifted");
        assert!(AlertLevel::Critical > AlertLevel::Warning);
        assert!(AlertLevel::Warning > AlertLevel::Info);
    }
}
