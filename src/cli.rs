//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use vendor_sync::output::OutputConfig;

use crate::commands;

/// vendor-sync - Vendor git repositories and pin them to locked revisions
#[derive(Parser, Debug)]
#[command(name = "vendor-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone, pin and prune every declared package, then write the lock and manifest
    Sync(commands::sync::SyncArgs),

    /// Check the configuration and show which packages are pinned
    Validate(commands::validate::ValidateArgs),

    /// Display the declared packages as a tree
    Tree(commands::tree::TreeArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, output),
            Commands::Validate(args) => commands::validate::execute(args, output),
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under tests
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
