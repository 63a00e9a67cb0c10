//! memdrop - Memcached object-cache dropin manager
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use memdrop::cli::{Cli, Commands};
use memdrop::config::{Config, ConfigManager};
use memdrop::error::MemdropResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MemdropResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let config = config_manager.load().await?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Enable(args) => memdrop::cli::commands::enable(args, &config).await,
        Commands::Disable(args) => memdrop::cli::commands::disable(args, &config).await,
        Commands::Toggle(args) => memdrop::cli::commands::toggle(args, &config).await,
        Commands::Reconcile => memdrop::cli::commands::reconcile(&config).await,
        Commands::Refresh => memdrop::cli::commands::refresh(&config).await,
        Commands::Status(args) => memdrop::cli::commands::status(args, &config).await,
        Commands::Config(args) => {
            memdrop::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `general.log_format = "json"` for JSON lines
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("memdrop=warn"),
        1 => EnvFilter::new("memdrop=info"),
        _ => EnvFilter::new("memdrop=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
