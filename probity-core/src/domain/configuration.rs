// probity-core/src/domain/configuration.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::alert::DEFAULT_ALERT_CONTEXT;
use crate::domain::drift::DriftPolicy;
use crate::domain::explain::DEFAULT_TOP_K;

/// Everything an [`Analyzer`](crate::application::Analyzer) can be tuned with.
/// Every section is optional in the YAML file.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default, PartialEq)]
pub struct AnalyticsConfig {
    #[validate(nested)]
    #[serde(default)]
    pub drift: DriftPolicy,

    #[validate(nested)]
    #[serde(default)]
    pub explanation: ExplanationConfig,

    #[validate(nested)]
    #[serde(default)]
    pub alerting: AlertingConfig,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ExplanationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[validate(range(min = 1, message = "top_k must keep at least one feature"))]
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct AlertingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Label used in alert titles.
    #[validate(custom(function = "validate_context"))]
    #[serde(default = "default_context")]
    pub context: String,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            context: DEFAULT_ALERT_CONTEXT.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_context() -> String {
    DEFAULT_ALERT_CONTEXT.to_string()
}

fn validate_context(context: &str) -> Result<(), ValidationError> {
    if context.trim().is_empty() {
        let mut err = ValidationError::new("blank_context");
        err.message = Some("alerting context cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
