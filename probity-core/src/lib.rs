// probity-core/src/lib.rs

// 1. Documentation is not mandatory yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the collaborators the engine does not own: scorer, explainer, alert sink.
pub mod ports;

// 2. Domain (pure analytics)
// Dataset model, statistics, profiler, features, drift, scoring adapter.
// Depends on nothing but the ports.
pub mod domain;

// 3. Infrastructure (Adapters)
// Config files, tracing-backed alert sink.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration: analyze a dataset, compare two datasets.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::ProbityError;

pub use application::{AnalysisOutcome, Analyzer};
pub use domain::anomaly::{AnomalyResult, Prediction, Severity, score_anomaly};
pub use domain::dataset::{DataKind, Dataset, Value};
pub use domain::drift::{DriftReport, detect_drift};
pub use domain::features::{FeatureVector, generate_features};
pub use domain::quality::{QualityReport, run_data_quality_checks};
