pub mod alert;
pub mod anomaly;
pub mod configuration;
pub mod dataset;
pub mod drift;
pub mod error;
pub mod explain;
pub mod features;
pub mod quality;
pub mod statistics;
pub mod zscore;

pub use error::DomainError;
