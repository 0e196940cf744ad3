// probity-core/src/application/mod.rs

pub mod pipeline;

// --- RE-EXPORTS (FACADE PATTERN) ---
pub use pipeline::{AnalysisOutcome, Analyzer};
