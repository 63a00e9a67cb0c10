//! Configuration schema for memdrop
//!
//! Configuration is stored at `~/.config/memdrop/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Memcached discovery and probing
    pub backend: BackendConfig,

    /// Object-cache dropin location and template
    pub dropin: DropinConfig,

    /// Persisted options store
    pub settings: SettingsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Backend discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Address Memcached listens on
    pub host: String,

    /// Hosting account name (defaults to $USER)
    pub account: Option<String>,

    /// Directory holding account home directories
    pub home_root: PathBuf,

    /// Status directory inside the account home
    pub status_subpath: PathBuf,

    /// Status file name inside `status_subpath`
    pub status_filename: String,

    /// Token preceding `||<port>` in the status file
    pub token_prefix: String,

    /// TCP connect timeout for the probe
    pub connect_timeout_ms: u64,

    /// Timeout for each probe request/response
    pub io_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            account: None,
            home_root: PathBuf::from("/home"),
            status_subpath: PathBuf::from(".SGCache"),
            status_filename: "cache_status".to_string(),
            token_prefix: "memcache".to_string(),
            connect_timeout_ms: 1000,
            io_timeout_ms: 1000,
        }
    }
}

/// Dropin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropinConfig {
    /// Content directory the host application loads dropins from
    pub content_dir: PathBuf,

    /// Dropin file name
    pub filename: String,

    /// Custom template (bundled template when unset)
    pub template: Option<PathBuf>,
}

impl Default for DropinConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("wp-content"),
            filename: "object-cache.php".to_string(),
            template: None,
        }
    }
}

impl DropinConfig {
    /// Full path of the dropin file
    pub fn path(&self) -> PathBuf {
        self.content_dir.join(&self.filename)
    }
}

/// Options store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Options file (defaults to the state directory)
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[backend]"));
        assert!(toml.contains("[dropin]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.host, "127.0.0.1");
        assert_eq!(config.backend.token_prefix, "memcache");
        assert!(config.dropin.template.is_none());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [dropin]
            content_dir = "/srv/site/wp-content"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.dropin.path(),
            PathBuf::from("/srv/site/wp-content/object-cache.php")
        );
        assert_eq!(config.backend.status_filename, "cache_status"); // default preserved
    }
}
