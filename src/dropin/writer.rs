//! Install and remove the object-cache dropin
//!
//! The host application loads the dropin on every request, so a
//! half-written file must never be visible. Installs go through
//! [`write_atomic`].

use crate::backend::Endpoint;
use crate::dropin::template::{render, TemplateSource};
use crate::error::{MemdropError, MemdropResult};
use crate::fsutil::write_atomic;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Owns the dropin file at its fixed path
#[derive(Debug, Clone)]
pub struct DropinWriter {
    path: PathBuf,
    template: TemplateSource,
}

impl DropinWriter {
    pub fn new(path: PathBuf, template: TemplateSource) -> Self {
        Self { path, template }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the dropin is present and readable
    pub async fn exists(&self) -> bool {
        match fs::File::open(&self.path).await {
            Ok(file) => file.metadata().await.map(|m| m.is_file()).unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Current dropin contents, if readable
    pub async fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).await.ok()
    }

    /// Whether the installed dropin is exactly what `install(endpoint)` would write
    pub async fn is_current_for(&self, endpoint: &Endpoint) -> bool {
        let Ok(template) = self.template.load().await else {
            return false;
        };
        self.read().await.as_deref() == Some(render(&template, endpoint).as_str())
    }

    /// Render the template for `endpoint` and atomically install it
    pub async fn install(&self, endpoint: &Endpoint) -> MemdropResult<()> {
        let template = self.template.load().await?;
        let contents = render(&template, endpoint);

        write_atomic(&self.path, contents.as_bytes())
            .await
            .map_err(|e| MemdropError::DropinWrite {
                path: self.path.clone(),
                source: e,
            })?;

        info!("Installed dropin {} for {}", self.path.display(), endpoint);
        Ok(())
    }

    /// Delete the dropin.
    ///
    /// Returns `true` if a file was deleted, `false` if there was nothing
    /// readable to delete.
    pub async fn remove(&self) -> MemdropResult<bool> {
        if !self.exists().await {
            debug!("No dropin at {}, nothing to remove", self.path.display());
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .await
            .map_err(|e| MemdropError::DropinRemove {
                path: self.path.clone(),
                source: e,
            })?;

        info!("Removed dropin {}", self.path.display());
        Ok(true)
    }
}
