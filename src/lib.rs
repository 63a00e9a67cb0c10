//! memdrop - Memcached object-cache dropin manager
//!
//! Discovers the hosting account's Memcached port, verifies the backend
//! with a live set/get round trip, and keeps the object-cache dropin on
//! disk in line with the desired enabled/disabled state.

pub mod audit;
pub mod backend;
pub mod cli;
pub mod config;
pub mod dropin;
pub mod error;
mod fsutil;
pub mod reconcile;
pub mod settings;

pub use error::{MemdropError, MemdropResult};
pub use reconcile::ReconciliationEngine;
