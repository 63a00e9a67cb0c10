//! CLI command implementations

pub mod apply;
pub mod config;
pub mod reconcile;
pub mod refresh;
pub mod status;
pub mod toggle;

pub use apply::{disable, enable};
pub use config::execute as config;
pub use reconcile::execute as reconcile;
pub use refresh::execute as refresh;
pub use status::execute as status;
pub use toggle::execute as toggle;

use crate::config::{Config, ConfigManager};
use crate::settings::JsonSettings;

/// Options store selected by the config
pub(crate) fn settings_store(config: &Config) -> JsonSettings {
    let path = config
        .settings
        .path
        .clone()
        .unwrap_or_else(ConfigManager::options_path);
    JsonSettings::new(path)
}
