//! Refresh command - rewrite the dropin for the current port

use crate::audit::AuditLog;
use crate::cli::commands::settings_store;
use crate::config::Config;
use crate::error::{MemdropError, MemdropResult};
use crate::reconcile::{Action, ReconciliationEngine};
use crate::settings::{SettingsStore, ENABLE_MEMCACHED};
use console::style;
use serde_json::json;

/// Execute the refresh command
pub async fn execute(config: &Config) -> MemdropResult<()> {
    let engine = ReconciliationEngine::from_config(config)?;
    let settings = settings_store(config);
    let audit = AuditLog::new(config);

    if !settings.is_enabled(ENABLE_MEMCACHED).await? {
        println!(
            "{} Memcached is disabled, nothing to refresh",
            style("!").yellow()
        );
        return Ok(());
    }

    let failure = match engine.refresh().await {
        Ok(report) => {
            audit.record_report(&report).await;
            match report.outcome {
                Ok(Action::Installed(endpoint)) => {
                    println!(
                        "{} Dropin now points at {}",
                        style("✓").green(),
                        style(endpoint).cyan()
                    );
                    return Ok(());
                }
                Ok(_) => return Ok(()),
                Err(failure) => failure.to_string(),
            }
        }
        Err(e) => e.to_string(),
    };

    // The enabled setting must not outlive its dropin
    if !engine.dropin().exists().await {
        settings.disable_option(ENABLE_MEMCACHED).await?;
        audit
            .log(
                "settings.rolled_back",
                &json!({ "desired": true, "now": false, "reason": failure }),
            )
            .await;
    }

    Err(MemdropError::ReconcileFailed(failure))
}
