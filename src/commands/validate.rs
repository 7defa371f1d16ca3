//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks the package
//! declarations without cloning anything.
//!
//! ## Functionality
//!
//! - **Configuration Validation**: Parses `config.yaml` and applies the same
//!   rules `sync` does (names, required `git`, one level of nesting,
//!   consistent duplicate declarations).
//! - **Lock Status**: Reports which packages are already pinned and which
//!   lock entries are no longer declared.
//! - **JSON Output**: `--json` prints the same report in machine-readable form.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::ProjectArgs;
use vendor_sync::config::{self, Config, Placement};
use vendor_sync::lock::LockFile;
use vendor_sync::output::{emoji, short_revision, OutputConfig};

/// Validate the package configuration
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// One declared package as reported by `validate`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PackageReport {
    pub name: String,
    pub git: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub keep: Vec<String>,
    pub locked: Option<String>,
}

/// The full `validate` report.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub packages: Vec<PackageReport>,
    pub stale_lock_entries: Vec<String>,
}

impl ValidationReport {
    pub fn build(config: &Config, lock: &LockFile) -> Self {
        let packages = config
            .entries()
            .into_iter()
            .map(|entry| PackageReport {
                name: entry.package.name.clone(),
                git: entry.package.git.clone(),
                parent: match entry.placement {
                    Placement::TopLevel => None,
                    Placement::Nested { parent } => Some(parent.to_string()),
                },
                keep: entry.package.keep.clone(),
                locked: lock.get(&entry.package.name).map(str::to_string),
            })
            .collect();

        Self {
            packages,
            stale_lock_entries: lock
                .stale_entries(config)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, output: OutputConfig) -> Result<()> {
    let config_path = args.project.config_path();
    let lock_path = args.project.lock_path();

    let config = config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let lock = LockFile::load(&lock_path)
        .with_context(|| format!("Failed to load lock file {}", lock_path.display()))?;
    let report = ValidationReport::build(&config, &lock);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Configuration is valid: {}",
        emoji(&output, "✅", "[OK]"),
        config_path.display()
    );
    println!("   {} package(s) declared", report.packages.len());
    println!();

    for package in &report.packages {
        let placement = match &package.parent {
            Some(parent) => format!(" (under {})", parent),
            None => String::new(),
        };
        let status = match &package.locked {
            Some(revision) => format!("pinned at {}", short_revision(revision)),
            None => "not pinned yet".to_string(),
        };
        println!(
            "{} {}{}: {}",
            emoji(&output, "📦", "-"),
            package.name,
            placement,
            status
        );
        println!("     {}", package.git);
        if !package.keep.is_empty() {
            println!("     keep: {}", package.keep.join(", "));
        }
    }

    if !report.stale_lock_entries.is_empty() {
        println!();
        println!(
            "{} Lock entries with no declaration: {}",
            emoji(&output, "⚠️ ", "[WARN]"),
            report.stale_lock_entries.join(", ")
        );
    }

    Ok(())
}
