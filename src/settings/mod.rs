//! Settings collaborator: persisted options and admin parameters

pub mod parameter;
pub mod store;

pub use parameter::{Parameter, ENABLE_MEMCACHED};
pub use store::{truthy, JsonSettings, SettingsStore};
