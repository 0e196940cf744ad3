pub mod analytics;

pub use crate::domain::configuration::{AlertingConfig, AnalyticsConfig, ExplanationConfig};
pub use analytics::{
    CONFIG_FILES, apply_overrides, load_analytics_config, load_analytics_config_or_default,
    load_analytics_config_with,
};
