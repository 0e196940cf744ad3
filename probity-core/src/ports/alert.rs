// probity-core/src/ports/alert.rs

use crate::domain::alert::Alert;
use crate::domain::error::DomainError;

/// Delivery channel for alerts (log, chat webhook, pager...).
pub trait AlertSink: Send + Sync {
    fn send(&self, alert: &Alert) -> Result<(), DomainError>;
}
