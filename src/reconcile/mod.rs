//! Convergence of the dropin with the desired Memcached state

pub mod engine;
pub mod report;

pub use engine::ReconciliationEngine;
pub use report::{Action, Correction, Failure, Report, StartupReport, ToggleResponse};
