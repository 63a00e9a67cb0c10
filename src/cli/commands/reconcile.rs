//! Reconcile command - startup drift correction

use crate::audit::AuditLog;
use crate::cli::commands::settings_store;
use crate::config::Config;
use crate::error::MemdropResult;
use crate::reconcile::{Correction, ReconciliationEngine};
use console::style;

/// Execute the reconcile command
pub async fn execute(config: &Config) -> MemdropResult<()> {
    let engine = ReconciliationEngine::from_config(config)?;
    let settings = settings_store(config);

    let report = engine.startup(&settings).await?;
    AuditLog::new(config).record_startup(&report).await;

    let wanted = if report.desired { "enabled" } else { "disabled" };
    match &report.correction {
        Correction::None => {
            println!("{} Dropin matches desired state ({})", style("✓").green(), wanted);
        }
        Correction::Applied(_) => {
            println!(
                "{} Corrected drift, Memcached {}",
                style("✓").green(),
                style(wanted).cyan()
            );
        }
        Correction::RolledBack { reason, .. } => {
            println!(
                "{} Could not keep Memcached {}: {}",
                style("!").yellow(),
                wanted,
                reason
            );
            println!(
                "  Setting changed to {}",
                style(if report.desired_after() { "enabled" } else { "disabled" }).cyan()
            );
        }
    }

    Ok(())
}
