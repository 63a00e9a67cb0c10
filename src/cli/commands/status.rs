//! Status command - report desired vs. actual state without changing it

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::cli::commands::settings_store;
use crate::config::Config;
use crate::error::MemdropResult;
use crate::reconcile::ReconciliationEngine;
use crate::settings::{SettingsStore, ENABLE_MEMCACHED};
use console::{style, Emoji};
use serde_json::json;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> MemdropResult<()> {
    let engine = ReconciliationEngine::from_config(config)?;
    let desired = settings_store(config).is_enabled(ENABLE_MEMCACHED).await?;
    let present = engine.dropin().exists().await;
    let discovered = engine.discover().await;

    let current = match (&discovered, present) {
        (Ok(endpoint), true) => Some(engine.dropin().is_current_for(endpoint).await),
        _ => None,
    };

    let probe = match (&discovered, args.no_probe) {
        (Ok(endpoint), false) => Some(engine.probe(endpoint).await),
        _ => None,
    };

    if matches!(args.format, OutputFormat::Json) {
        let report = json!({
            "account": engine.account(),
            "desired": desired,
            "dropin": {
                "path": engine.dropin().path(),
                "present": present,
                "current": current,
            },
            "endpoint": discovered.as_ref().ok().map(ToString::to_string),
            "discovery_error": discovered.as_ref().err().map(ToString::to_string),
            "probe": probe.map(|p| json!({
                "reachable": p.reachable,
                "round_trip_correct": p.round_trip_correct,
            })),
            "converged": desired == present,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style("Memcached Dropin Status").bold().cyan());
    println!();

    println!("{}", style("Setting:").bold());
    println!(
        "  {} Desired: {}",
        CHECK,
        if desired { "enabled" } else { "disabled" }
    );

    println!();
    println!("{}", style("Dropin:").bold());
    println!("  {} Path: {}", CHECK, engine.dropin().path().display());
    if desired == present {
        println!(
            "  {} {}",
            CHECK,
            style(if present { "Installed" } else { "Not installed" }).green()
        );
    } else {
        println!(
            "  {} {} - Run: memdrop reconcile",
            WARN,
            style(if present { "Installed but disabled" } else { "Missing" }).yellow()
        );
    }

    if current == Some(false) {
        println!(
            "  {} {} - Run: memdrop refresh",
            WARN,
            style("Points at a different endpoint").yellow()
        );
    }

    println!();
    println!("{}", style("Backend:").bold());
    println!("  {} Account: {}", CHECK, engine.account());
    println!("  {} Status file: {}", CHECK, engine.status_file().display());
    match &discovered {
        Ok(endpoint) => println!("  {} Endpoint: {}", CHECK, style(endpoint).green()),
        Err(why) => println!("  {} {}", CROSS, style(why).red()),
    }
    match probe {
        Some(p) if p.is_working() => println!("  {} {}", CHECK, style("Round trip OK").green()),
        Some(p) if p.reachable => println!(
            "  {} {}",
            CROSS,
            style("Reachable, but the test value did not round-trip").red()
        ),
        Some(_) => println!("  {} {}", CROSS, style("Not reachable").red()),
        None => {}
    }

    Ok(())
}
