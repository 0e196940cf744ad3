// probity-core/src/infrastructure/alerting.rs

use tracing::{error, info, warn};

use crate::domain::alert::{Alert, AlertLevel};
use crate::domain::error::DomainError;
use crate::ports::AlertSink;

/// Writes alerts to the `tracing` pipeline, picking the log level from the
/// alert level. Whatever subscriber the host installed decides where they go.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn send(&self, alert: &Alert) -> Result<(), DomainError> {
        let details = serde_json::Value::Object(alert.details.clone()).to_string();
        match alert.level {
            AlertLevel::Critical => error!(
                context = %alert.context,
                raised_at = %alert.raised_at,
                details = %details,
                "🚨 {}", alert
            ),
            AlertLevel::Warning => warn!(
                context = %alert.context,
                raised_at = %alert.raised_at,
                details = %details,
                "{}", alert
            ),
            AlertLevel::Info => info!(
                context = %alert.context,
                raised_at = %alert.raised_at,
                details = %details,
                "{}", alert
            ),
        }
        Ok(())
    }
}
