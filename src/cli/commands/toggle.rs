//! Toggle command - flip an admin parameter, print the final state

use crate::audit::AuditLog;
use crate::cli::args::ToggleArgs;
use crate::cli::commands::settings_store;
use crate::config::Config;
use crate::error::{MemdropError, MemdropResult};
use crate::reconcile::ReconciliationEngine;
use crate::settings::Parameter;

/// Execute the toggle command
///
/// Prints the final numeric state on stdout even when the toggle is
/// rejected, so callers can redraw the switch from the output alone.
pub async fn execute(args: ToggleArgs, config: &Config) -> MemdropResult<()> {
    let parameter: Parameter = args.parameter.parse()?;
    let engine = ReconciliationEngine::from_config(config)?;
    let settings = settings_store(config);

    let response = engine.toggle(&settings, parameter).await?;
    AuditLog::new(config).record_toggle(&response).await;

    println!("{}", response.state);

    match response.error {
        Some(message) => Err(MemdropError::ToggleRejected {
            option: response.option.to_string(),
            message,
        }),
        None => Ok(()),
    }
}
