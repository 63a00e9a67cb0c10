//! Enable/disable commands - converge the dropin, then save the setting

use crate::audit::AuditLog;
use crate::cli::args::ApplyArgs;
use crate::cli::commands::settings_store;
use crate::config::Config;
use crate::error::{MemdropError, MemdropResult};
use crate::reconcile::{Action, ReconciliationEngine};
use console::style;
use serde_json::json;

/// Execute the enable command
pub async fn enable(args: ApplyArgs, config: &Config) -> MemdropResult<()> {
    execute(true, args, config).await
}

/// Execute the disable command
pub async fn disable(args: ApplyArgs, config: &Config) -> MemdropResult<()> {
    execute(false, args, config).await
}

async fn execute(desired: bool, args: ApplyArgs, config: &Config) -> MemdropResult<()> {
    let engine = ReconciliationEngine::from_config(config)?;
    let audit = AuditLog::new(config);

    let applied = if args.no_save {
        engine.apply(desired).await
    } else {
        // Saved only once the dropin matches
        engine.apply_and_save(&settings_store(config), desired).await
    };

    let report = match applied {
        Ok(report) => report,
        Err(e) => {
            audit
                .log(
                    "reconcile.failed",
                    &json!({ "desired": desired, "reason": e.to_string() }),
                )
                .await;
            return Err(e);
        }
    };
    audit.record_report(&report).await;

    if let Some(failure) = report.failure_reason() {
        return Err(MemdropError::ReconcileFailed(failure.to_string()));
    }

    let message = match &report.outcome {
        Ok(Action::Installed(endpoint)) => format!(
            "Memcached enabled via {} ({})",
            style(endpoint).cyan(),
            engine.dropin().path().display()
        ),
        Ok(Action::Removed) => format!(
            "Memcached disabled, removed {}",
            engine.dropin().path().display()
        ),
        _ if desired => "Memcached already enabled".to_string(),
        _ => "Memcached already disabled".to_string(),
    };
    println!("{} {}", style("✓").green(), message);

    Ok(())
}
