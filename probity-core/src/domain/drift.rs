// probity-core/src/domain/drift.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use validator::Validate;

use crate::domain::dataset::Dataset;
use crate::domain::statistics::{
    DEFAULT_BUCKETS, Divergence, KsTest, kl_divergence, population_stability_index, two_sample_ks,
};

// ── Policy ───────────────────────────────────────────────────────────

/// Drift decision thresholds. A column drifts when
/// `psi > psi_threshold` or `p_value < ks_alpha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DriftPolicy {
    #[validate(range(min = 0.0, message = "psi_threshold cannot be negative"))]
    pub psi_threshold: f64,

    #[validate(range(min = 0.0, max = 1.0, message = "ks_alpha must lie in [0, 1]"))]
    pub ks_alpha: f64,

    #[validate(range(min = 1, max = 1000, message = "buckets must be between 1 and 1000"))]
    pub buckets: usize,
}

impl Default for DriftPolicy {
    fn default() -> Self {
        Self {
            psi_threshold: 0.25,
            ks_alpha: 0.05,
            buckets: DEFAULT_BUCKETS,
        }
    }
}

impl DriftPolicy {
    pub fn is_drifted(&self, psi: Divergence, ks: &KsTest) -> bool {
        psi.value() > self.psi_threshold || ks.p_value < self.ks_alpha
    }
}

// ── Report Structures ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDrift {
    pub psi: Divergence,
    pub ks_test: KsTest,
    pub kl_divergence: Divergence,
    pub drift_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DriftReport {
    /// Numeric columns common to both datasets, counted before columns with
    /// no data on one side are skipped. Can exceed `details.len()`.
    pub columns_analyzed: usize,
    pub drifted_columns: usize,
    pub details: BTreeMap<String, ColumnDrift>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        self.drifted_columns > 0
    }

    pub fn drifted(&self) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .filter(|(_, d)| d.drift_detected)
            .map(|(name, _)| name.as_str())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ── Detector ─────────────────────────────────────────────────────────

/// Column-by-column drift between a reference and a current dataset with the
/// default policy (PSI 0.25, KS alpha 0.05, 10 buckets).
pub fn detect_drift(reference: &Dataset, current: &Dataset) -> DriftReport {
    detect_drift_with(reference, current, &DriftPolicy::default())
}

pub fn detect_drift_with(
    reference: &Dataset,
    current: &Dataset,
    policy: &DriftPolicy,
) -> DriftReport {
    let ref_numeric: BTreeSet<&str> = reference.numeric_columns().into_iter().collect();
    let cur_numeric: BTreeSet<&str> = current.numeric_columns().into_iter().collect();
    let common: Vec<&str> = ref_numeric.intersection(&cur_numeric).copied().collect();

    let mut report = DriftReport {
        columns_analyzed: common.len(),
        ..Default::default()
    };

    for column in common {
        let (Some(ref_idx), Some(cur_idx)) =
            (reference.column_index(column), current.column_index(column))
        else {
            continue;
        };
        let ref_data = reference.numeric_values(ref_idx);
        let cur_data = current.numeric_values(cur_idx);

        if ref_data.is_empty() || cur_data.is_empty() {
            warn!(column, "Skipping drift check: no data on one side");
            continue;
        }

        let psi = population_stability_index(&ref_data, &cur_data, policy.buckets);
        let ks_test = two_sample_ks(&ref_data, &cur_data);
        let kl = kl_divergence(&ref_data, &cur_data, policy.buckets);
        let drift_detected = policy.is_drifted(psi, &ks_test);

        debug!(
            column,
            psi = psi.value(),
            ks_statistic = ks_test.statistic,
            p_value = ks_test.p_value,
            kl = kl.value(),
            drift_detected,
            "Column drift computed"
        );

        if drift_detected {
            report.drifted_columns += 1;
        }
        report.details.insert(
            column.to_string(),
            ColumnDrift {
                psi,
                ks_test,
                kl_divergence: kl,
                drift_detected,
            },
        );
    }

    report
}
