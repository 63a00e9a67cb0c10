//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// memdrop - Memcached object-cache dropin manager
///
/// Discovers the account's Memcached port, verifies it, and keeps the
/// object-cache dropin in sync with the desired state.
#[derive(Parser, Debug)]
#[command(name = "memdrop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEMDROP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enable the Memcached object cache
    Enable(ApplyArgs),

    /// Disable the Memcached object cache
    Disable(ApplyArgs),

    /// Toggle an admin parameter and print its final state (0/1)
    Toggle(ToggleArgs),

    /// Correct drift between the saved setting and the dropin
    Reconcile,

    /// Rewrite the dropin for the currently discovered port
    Refresh,

    /// Show desired state, dropin presence and backend health
    Status(StatusArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for enable/disable
#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Converge the dropin without saving the setting
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the toggle command
#[derive(Parser, Debug)]
pub struct ToggleArgs {
    /// Parameter name: memcached, dynamic-cache, autoflush-cache
    pub parameter: String,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Skip the live Memcached probe
    #[arg(long)]
    pub no_probe: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for status
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output
    Json,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
