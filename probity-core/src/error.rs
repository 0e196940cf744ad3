// probity-core/src/error.rs

use crate::domain::error::{DomainError, ExplainerError, ScorerError};
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbityError {
    // --- DOMAIN ERRORS (dataset shape, scorer, explainer) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, config parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Shortcuts so `?` works on port errors from application code
impl From<ScorerError> for ProbityError {
    fn from(err: ScorerError) -> Self {
        ProbityError::Domain(DomainError::Scoring(err))
    }
}

impl From<ExplainerError> for ProbityError {
    fn from(err: ExplainerError) -> Self {
        ProbityError::Domain(DomainError::Explanation(err))
    }
}

impl From<std::io::Error> for ProbityError {
    fn from(err: std::io::Error) -> Self {
        ProbityError::Infrastructure(InfrastructureError::Io(err))
    }
}
