// probity-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Malformed dataset: {0}")]
    #[diagnostic(
        code(probity::domain::dataset),
        help("Every column of a dataset must hold one value per row.")
    )]
    MalformedDataset(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scoring(#[from] ScorerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Explanation(#[from] ExplainerError),

    #[error("Alert delivery failed: {0}")]
    #[diagnostic(code(probity::domain::alert))]
    AlertDelivery(String),
}

/// Failures surfaced by a scorer. The scoring adapter does not validate the
/// feature schema itself; a scorer that does reports it here.
#[derive(Error, Debug, Diagnostic)]
pub enum ScorerError {
    #[error("Feature schema mismatch: scorer expects [{expected}], got [{found}]")]
    #[diagnostic(
        code(probity::scorer::schema),
        help("Structured inputs scored by one model must share the same column set.")
    )]
    SchemaMismatch { expected: String, found: String },

    #[error("Scorer returned no output for {0} input row(s)")]
    #[diagnostic(code(probity::scorer::empty_output))]
    EmptyOutput(usize),

    #[error(
        "Not enough history to score (need at least {required} observations, have {available})"
    )]
    #[diagnostic(
        code(probity::scorer::history),
        help("Feed the baseline with more normal batches before scoring.")
    )]
    NotEnoughHistory { required: u64, available: u64 },

    #[error("Scorer backend failure: {0}")]
    #[diagnostic(code(probity::scorer::backend))]
    Backend(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum ExplainerError {
    #[error("Explainer cannot attribute scores for this scorer: {0}")]
    #[diagnostic(code(probity::explainer::unsupported))]
    Unsupported(String),

    #[error("Explainer backend failure: {0}")]
    #[diagnostic(code(probity::explainer::backend))]
    Backend(String),
}
