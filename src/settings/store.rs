//! Options persistence
//!
//! The reconciliation core only needs a small key-value settings API; the
//! JSON file store here backs the CLI.

use crate::error::{MemdropError, MemdropResult};
use crate::fsutil::write_atomic;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Key-value settings collaborator
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current value of `name`, if set
    async fn get_option(&self, name: &str) -> MemdropResult<Option<Value>>;

    /// Store `value` under `name`.
    ///
    /// Returns `false` when the stored value was already equal.
    async fn update_option(&self, name: &str, value: Value) -> MemdropResult<bool>;

    async fn enable_option(&self, name: &str) -> MemdropResult<()> {
        self.update_option(name, Value::from(1)).await.map(|_| ())
    }

    async fn disable_option(&self, name: &str) -> MemdropResult<()> {
        self.update_option(name, Value::from(0)).await.map(|_| ())
    }

    async fn is_enabled(&self, name: &str) -> MemdropResult<bool> {
        Ok(self.get_option(name).await?.as_ref().is_some_and(truthy))
    }
}

/// Loose truthiness of a stored option: `1`, `true`, `"1"`, `"yes"` all count
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Options kept as a JSON object in a single file
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSettings {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> MemdropResult<BTreeMap<String, Value>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Options file {} not found, starting empty", self.path.display());
                Ok(BTreeMap::new())
            }
            Err(e) => Err(MemdropError::io(
                format!("reading options from {}", self.path.display()),
                e,
            )),
        }
    }

    async fn save(&self, options: &BTreeMap<String, Value>) -> MemdropResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                MemdropError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(options)?;
        write_atomic(&self.path, content.as_bytes())
            .await
            .map_err(|e| {
                MemdropError::io(format!("writing options to {}", self.path.display()), e)
            })
    }
}

#[async_trait]
impl SettingsStore for JsonSettings {
    async fn get_option(&self, name: &str) -> MemdropResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(name))
    }

    async fn update_option(&self, name: &str, value: Value) -> MemdropResult<bool> {
        let _guard = self.lock.lock().await;
        let mut options = self.load().await?;

        if options.get(name) == Some(&value) {
            return Ok(false);
        }

        debug!("Setting option {} = {}", name, value);
        options.insert(name.to_string(), value);
        self.save(&options).await?;
        Ok(true)
    }
}
