//! Dropin template loading and rendering

use crate::backend::Endpoint;
use crate::error::{MemdropError, MemdropResult};
use std::path::PathBuf;
use tokio::fs;

/// Token replaced with `host:port` when rendering
pub const PLACEHOLDER: &str = "@changedefaults@";

/// Template shipped with the binary
pub const BUNDLED: &str = include_str!("../../templates/object-cache.tpl");

/// Where the dropin template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Bundled,
    File(PathBuf),
}

impl TemplateSource {
    pub fn from_config(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Bundled,
        }
    }

    /// Load the raw template text.
    ///
    /// A missing custom template is a hard error.
    pub async fn load(&self) -> MemdropResult<String> {
        match self {
            Self::Bundled => Ok(BUNDLED.to_string()),
            Self::File(path) => {
                fs::read_to_string(path)
                    .await
                    .map_err(|e| MemdropError::TemplateRead {
                        path: path.clone(),
                        source: e,
                    })
            }
        }
    }
}

/// Substitute every placeholder with `endpoint`; nothing else changes
pub fn render(template: &str, endpoint: &Endpoint) -> String {
    template.replace(PLACEHOLDER, &endpoint.to_string())
}
