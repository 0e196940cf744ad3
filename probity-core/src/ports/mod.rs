// probity-core/src/ports/mod.rs

pub mod alert;
pub mod explainer;
pub mod scorer;

pub use alert::AlertSink;
pub use explainer::{Explainer, NoExplainer};
pub use scorer::Scorer;
