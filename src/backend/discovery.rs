//! Memcached port discovery from the account status file
//!
//! The hosting platform assigns each account its own Memcached port and
//! writes it into a free-text status file as `<prefix>||<port>`. The file
//! is re-read on every call since the port changes when the backend is
//! restarted.

use crate::config::schema::BackendConfig;
use crate::error::{MemdropError, MemdropResult};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Why no port could be discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Status file missing or unreadable
    StatusFileUnreadable(PathBuf),
    /// Status file has no `<prefix>||<port>` token
    TokenMissing(PathBuf),
    /// Token present but the number is not a usable TCP port
    InvalidPort { path: PathBuf, raw: String },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusFileUnreadable(path) => {
                write!(f, "status file {} is not readable", path.display())
            }
            Self::TokenMissing(path) => {
                write!(f, "no Memcached port listed in {}", path.display())
            }
            Self::InvalidPort { path, raw } => {
                write!(f, "invalid Memcached port {:?} in {}", raw, path.display())
            }
        }
    }
}

/// Locates the status file for an account and extracts the port from it
#[derive(Debug, Clone)]
pub struct PortDiscovery {
    home_root: PathBuf,
    status_subpath: PathBuf,
    status_filename: String,
    token: Regex,
}

impl PortDiscovery {
    /// Build from backend config
    pub fn new(config: &BackendConfig) -> MemdropResult<Self> {
        let pattern = format!(r"{}\|\|([0-9]+)", regex::escape(&config.token_prefix));
        let token = Regex::new(&pattern).map_err(|e| MemdropError::TokenPattern {
            prefix: config.token_prefix.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            home_root: config.home_root.clone(),
            status_subpath: config.status_subpath.clone(),
            status_filename: config.status_filename.clone(),
            token,
        })
    }

    /// Path of the status file for `account`
    pub fn status_file(&self, account: &str) -> PathBuf {
        self.home_root
            .join(account)
            .join(&self.status_subpath)
            .join(&self.status_filename)
    }

    /// Read the status file for `account` and return its Memcached port.
    ///
    /// Never errors: every failure means the backend is treated as absent.
    pub async fn discover(&self, account: &str) -> Result<u16, Unavailable> {
        let path = self.status_file(account);

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Cannot read status file {}: {}", path.display(), e);
                return Err(Unavailable::StatusFileUnreadable(path));
            }
        };

        let raw = match self.find_port_token(&contents) {
            Some(raw) => raw,
            None => return Err(Unavailable::TokenMissing(path)),
        };

        match raw.parse::<u16>() {
            Ok(port) if port != 0 => {
                debug!("Discovered Memcached port {} in {}", port, path.display());
                Ok(port)
            }
            _ => Err(Unavailable::InvalidPort {
                path,
                raw: raw.to_string(),
            }),
        }
    }

    /// First `<prefix>||<digits>` capture in `contents`, if any
    pub fn find_port_token<'a>(&self, contents: &'a str) -> Option<&'a str> {
        self.token
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
    }
}
