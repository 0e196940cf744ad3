// probity-core/src/infrastructure/config/analytics.rs

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::configuration::AnalyticsConfig;
use crate::infrastructure::error::InfrastructureError;

/// Looked up in this order inside the config directory.
pub const CONFIG_FILES: [&str; 2] = ["probity.yaml", "probity.yml"];

/// Loads `probity.yaml` (or `probity.yml`) from `dir`, applies `PROBITY_*`
/// environment overrides and validates the result.
pub fn load_analytics_config(dir: &Path) -> Result<AnalyticsConfig, InfrastructureError> {
    load_analytics_config_with(dir, |key| std::env::var(key).ok())
}

/// Like [`load_analytics_config`] but falls back to the defaults (still
/// subject to environment overrides) when there is no config file.
pub fn load_analytics_config_or_default(
    dir: &Path,
) -> Result<AnalyticsConfig, InfrastructureError> {
    let lookup = |key: &str| std::env::var(key).ok();
    match load_analytics_config_with(dir, lookup) {
        Err(InfrastructureError::ConfigNotFound(_)) => {
            debug!(dir = ?dir, "No analytics config file, using defaults");
            let mut config = AnalyticsConfig::default();
            apply_overrides(&mut config, lookup)?;
            config.validate()?;
            Ok(config)
        }
        other => other,
    }
}

/// Loader with an explicit environment lookup, so overrides can be tested
/// without touching the process environment.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_analytics_config_with<F>(
    dir: &Path,
    lookup: F,
) -> Result<AnalyticsConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = find_config_file(dir)?;
    info!(path = ?path, "Loading analytics configuration");

    let content = fs::read_to_string(&path)?;
    let mut config: AnalyticsConfig = if content.trim().is_empty() {
        AnalyticsConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    apply_overrides(&mut config, lookup)?;
    config.validate()?;
    Ok(config)
}

fn find_config_file(dir: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_FILES {
        let p = dir.join(filename);
        if p.is_file() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        dir, CONFIG_FILES
    )))
}

/// Layers `PROBITY_*` variables over a loaded config. Unparseable values are
/// configuration errors rather than being silently ignored.
pub fn apply_overrides<F>(config: &mut AnalyticsConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = parse_var::<f64, _>(&lookup, "PROBITY_PSI_THRESHOLD")? {
        info!(old = config.drift.psi_threshold, new = val, "Overriding PSI threshold via ENV");
        config.drift.psi_threshold = val;
    }
    if let Some(val) = parse_var::<f64, _>(&lookup, "PROBITY_KS_ALPHA")? {
        info!(old = config.drift.ks_alpha, new = val, "Overriding KS alpha via ENV");
        config.drift.ks_alpha = val;
    }
    if let Some(val) = parse_var::<usize, _>(&lookup, "PROBITY_BUCKETS")? {
        info!(old = config.drift.buckets, new = val, "Overriding bucket count via ENV");
        config.drift.buckets = val;
    }
    if let Some(val) = parse_var::<usize, _>(&lookup, "PROBITY_TOP_K")? {
        info!(old = config.explanation.top_k, new = val, "Overriding top-k via ENV");
        config.explanation.top_k = val;
    }
    if let Some(val) = parse_var::<bool, _>(&lookup, "PROBITY_ALERTING")? {
        info!(old = config.alerting.enabled, new = val, "Overriding alerting via ENV");
        config.alerting.enabled = val;
    }
    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, InfrastructureError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim().parse().map(Some).map_err(|e| {
        InfrastructureError::ConfigError(format!("{key}={raw:?} is not valid: {e}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply_over_defaults() -> Result<()> {
        let mut config = AnalyticsConfig::default();
        apply_overrides(
            &mut config,
            env(&[
                ("PROBITY_PSI_THRESHOLD", "0.1"),
                ("PROBITY_KS_ALPHA", " 0.01 "),
                ("PROBITY_BUCKETS", "20"),
                ("PROBITY_TOP_K", "3"),
                ("PROBITY_ALERTING", "false"),
            ]),
        )?;
        assert_eq!(config.drift.psi_threshold, 0.1);
        assert_eq!(config.drift.ks_alpha, 0.01);
        assert_eq!(config.drift.buckets, 20);
        assert_eq!(config.explanation.top_k, 3);
        assert!(!config.alerting.enabled);
        Ok(())
    }

    #[test]
    fn test_bad_override_is_a_config_error() {
        let mut config = AnalyticsConfig::default();
        let err = apply_overrides(&mut config, env(&[("PROBITY_BUCKETS", "ten")])).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(msg) if msg.contains("PROBITY_BUCKETS")));
    }

    #[test]
    fn test_yml_extension_is_found() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("probity.yml"), "explanation:\n  top_k: 2\n")?;
        let config = load_analytics_config_with(dir.path(), env(&[]))?;
        assert_eq!(config.explanation.top_k, 2);
        Ok(())
    }

    #[test]
    fn test_empty_file_means_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("probity.yaml"), "")?;
        let config = load_analytics_config_with(dir.path(), env(&[]))?;
        assert_eq!(config, AnalyticsConfig::default());
        Ok(())
    }

    #[test]
    fn test_override_is_validated() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("probity.yaml"), "drift:\n  buckets: 5\n")?;
        let err =
            load_analytics_config_with(dir.path(), env(&[("PROBITY_KS_ALPHA", "2.0")])).unwrap_err();
        assert!(matches!(err, InfrastructureError::Validation(_)));
        Ok(())
    }

    #[test]
    fn test_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let err = load_analytics_config_with(dir.path(), env(&[])).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }
}
