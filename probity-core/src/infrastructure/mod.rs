// probity-core/src/infrastructure/mod.rs

pub mod alerting;
pub mod config;
pub mod error;
