//! Audit trail of dropin side effects
//!
//! Writes JSON lines to `<state_dir>/memdrop/audit.log`. Every install,
//! removal and settings rollback is recorded so a broken site can be traced
//! back to the change that caused it.

use crate::config::{schema::Config, ConfigManager};
use crate::reconcile::{Action, Correction, Report, StartupReport, ToggleResponse};
use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File-based audit logger that appends JSON lines
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    /// Create a new audit logger from config
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: ConfigManager::audit_log_path(),
        }
    }

    /// Log an audit event as a JSON line
    ///
    /// Silently drops events on IO failure; auditing never fails the
    /// operation being audited.
    pub async fn log(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write audit log: {}", e);
        }
    }

    /// Record the side effect or failure of a reconciliation, if any
    pub async fn record_report(&self, report: &Report) {
        match &report.outcome {
            Ok(Action::Installed(endpoint)) => {
                self.log("dropin.installed", &json!({ "endpoint": endpoint.to_string() }))
                    .await
            }
            Ok(Action::Removed) => self.log("dropin.removed", &json!({})).await,
            Ok(Action::Unchanged) => {}
            Err(failure) => {
                self.log(
                    "reconcile.failed",
                    &json!({ "desired": report.desired, "reason": failure.to_string() }),
                )
                .await
            }
        }
    }

    /// Record what the startup pass changed
    pub async fn record_startup(&self, report: &StartupReport) {
        match &report.correction {
            Correction::None => {}
            Correction::Applied(applied) => self.record_report(applied).await,
            Correction::RolledBack { now, reason } => {
                self.log(
                    "settings.rolled_back",
                    &json!({ "desired": report.desired, "now": now, "reason": reason }),
                )
                .await
            }
        }
    }

    /// Record a parameter toggle
    pub async fn record_toggle(&self, response: &ToggleResponse) {
        let event = if response.error.is_some() {
            "parameter.rejected"
        } else {
            "parameter.updated"
        };
        self.log(
            event,
            &json!({
                "option": response.option,
                "state": response.state,
                "error": response.error,
            }),
        )
        .await
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
