//! Error types for memdrop
//!
//! Hard failures only. Expected reconciliation outcomes (backend absent,
//! probe mismatch, dropin write refused) are values of
//! [`crate::reconcile::Failure`], not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Shown when Memcached cannot be enabled for the account
pub const ENABLE_REJECTED: &str = "Please, first enable Memcached from your cPanel!";

/// Shown when the dropin cannot be removed
pub const DISABLE_REJECTED: &str = "Could not disable memcache!";

/// Result type alias for memdrop operations
pub type MemdropResult<T> = Result<T, MemdropError>;

/// All hard errors that can occur in memdrop
#[derive(Error, Debug)]
pub enum MemdropError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid port token prefix {prefix:?}: {reason}")]
    TokenPattern { prefix: String, reason: String },

    #[error("Could not determine the hosting account name")]
    AccountUnknown,

    // Dropin errors
    #[error("Failed to read dropin template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write dropin {path}: {source}")]
    DropinWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove dropin {path}: {source}")]
    DropinRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Settings errors
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("{message}")]
    ToggleRejected { option: String, message: String },

    #[error("Reconciliation failed: {0}")]
    ReconcileFailed(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl MemdropError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error means the dropin install did not happen.
    ///
    /// Callers fold these into the same handling as a failed install.
    pub fn is_install_failure(&self) -> bool {
        matches!(self, Self::TemplateRead { .. } | Self::DropinWrite { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AccountUnknown => Some("Set backend.account in the config or export USER"),
            Self::ToggleRejected { message, .. } if message == ENABLE_REJECTED => {
                Some("Enable Memcached for this account in the hosting control panel")
            }
            Self::TemplateRead { .. } => {
                Some("Unset dropin.template to use the bundled template")
            }
            Self::UnknownParameter(_) => {
                Some("Known parameters: memcached, dynamic-cache, autoflush-cache")
            }
            _ => None,
        }
    }
}
