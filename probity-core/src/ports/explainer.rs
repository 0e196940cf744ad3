// probity-core/src/ports/explainer.rs

use crate::domain::error::ExplainerError;
use crate::domain::features::FeatureVector;

/// Attribution backend (SHAP-style). Returns one `(feature, impact)` pair per
/// feature it can attribute; ranking is done by the engine.
pub trait Explainer<S: ?Sized>: Send + Sync {
    fn attributions(
        &self,
        scorer: &S,
        features: &FeatureVector,
    ) -> Result<Vec<(String, f64)>, ExplainerError>;
}

/// Placeholder for pipelines built without an explainer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExplainer;

impl<S: ?Sized> Explainer<S> for NoExplainer {
    fn attributions(
        &self,
        _scorer: &S,
        _features: &FeatureVector,
    ) -> Result<Vec<(String, f64)>, ExplainerError> {
        Ok(Vec::new())
    }
}
