// probity-core/src/domain/explain.rs

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::features::FeatureVector;
use crate::ports::Explainer;

pub const DEFAULT_TOP_K: usize = 5;

/// Contribution of one feature to an anomaly score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub feature: String,
    pub impact: f64,
}

/// Asks the explainer for per-feature attributions and keeps the `top_k`
/// strongest by absolute impact. Ties keep the explainer's order.
#[instrument(skip(explainer, scorer, features))]
pub fn explain_anomaly<S: ?Sized, E: Explainer<S> + ?Sized>(
    explainer: &E,
    scorer: &S,
    features: &FeatureVector,
    top_k: usize,
) -> Result<Vec<FeatureImpact>, DomainError> {
    let mut impacts: Vec<FeatureImpact> = explainer
        .attributions(scorer, features)?
        .into_iter()
        .map(|(feature, impact)| FeatureImpact { feature, impact })
        .collect();

    impacts.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    impacts.truncate(top_k);

    debug!(kept = impacts.len(), "Ranked feature impacts");
    Ok(impacts)
}
