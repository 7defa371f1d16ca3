//! # Sync Command Implementation
//!
//! The `sync` command is the tool's main job. For every declared package it:
//! 1. Deletes any existing working copy
//! 2. Clones the package source
//! 3. Checks out the locked revision, or records the fresh one
//! 4. Prunes everything outside the retain set
//!
//! and then writes the lock file and the manifest. A package whose upstream
//! has moved past its locked revision gets a highlighted notice; the pin is
//! kept regardless.

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Instant;

use super::ProjectArgs;
use vendor_sync::defaults::{resolve_in_root, MANIFEST_FILE_NAME};
use vendor_sync::manifest::ManifestLayout;
use vendor_sync::output::{emoji, package_spinner, short_revision, update_notice, OutputConfig};
use vendor_sync::sync::{PackageOutcome, Resolution, SyncEvent, SyncOptions, Synchronizer};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Manifest file to generate
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// How packages are laid out in the manifest
    #[arg(long, value_enum, default_value_t = ManifestLayout::Overrides)]
    pub layout: ManifestLayout,

    /// Only integrate this package (may be repeated); others keep their lock entries
    #[arg(short, long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Suppress progress output; update notices and errors are still shown
    #[arg(short, long)]
    pub quiet: bool,
}

impl SyncArgs {
    fn options(&self) -> SyncOptions {
        SyncOptions {
            config_path: self.project.config_path(),
            lock_path: self.project.lock_path(),
            manifest_path: resolve_in_root(
                &self.project.root,
                self.manifest.as_deref(),
                MANIFEST_FILE_NAME,
            ),
            layout: self.layout,
            only: self.packages.clone(),
        }
    }
}

/// Execute the sync command
pub fn execute(args: SyncArgs, output: OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let options = args.options();
    let quiet = args.quiet;
    let output = if quiet {
        OutputConfig {
            interactive: false,
            ..output
        }
    } else {
        output
    };

    let synchronizer = Synchronizer::new(&args.project.root);
    let mut spinner: Option<ProgressBar> = None;

    let result = synchronizer.execute(&options, &mut |event| match event {
        SyncEvent::Started(package) => {
            if quiet {
                return;
            }
            spinner = package_spinner(&output, &package.name);
            if spinner.is_none() {
                println!("Processing {}...", package.name);
            }
        }
        SyncEvent::Finished(outcome) => {
            if let Some(bar) = spinner.take() {
                bar.finish_and_clear();
            }
            if outcome.update_available().is_some() {
                println!("{}", update_notice(&output, &outcome.name));
            }
            if !quiet {
                println!("{}", describe(&output, outcome));
            }
        }
    });

    if let Some(bar) = spinner.take() {
        bar.finish_and_clear();
    }

    match result {
        Ok(report) => {
            if !quiet {
                println!();
                println!(
                    "{} Synced {} package(s) in {:.2}s",
                    emoji(&output, "✅", "[OK]"),
                    report.outcomes.len(),
                    start_time.elapsed().as_secs_f64()
                );
                if !report.skipped.is_empty() {
                    println!("   Skipped: {}", report.skipped.join(", "));
                }
                println!("   Lock file: {}", options.lock_path.display());
                println!(
                    "   Manifest: {} ({} entries)",
                    options.manifest_path.display(),
                    report.manifest_entries
                );
            }
            Ok(())
        }
        Err(e) => {
            if !quiet {
                println!("{} Sync failed", emoji(&output, "❌", "[ERR]"));
            }
            Err(e.into())
        }
    }
}

fn describe(output: &OutputConfig, outcome: &PackageOutcome) -> String {
    let how = match outcome.resolution {
        Resolution::Adopted => "newly pinned",
        Resolution::Pinned { .. } => "locked",
    };
    format!(
        "   {} {} @ {} ({}, {} entries pruned)",
        emoji(output, "📦", "-"),
        outcome.name,
        short_revision(&outcome.revision),
        how,
        outcome.removed.len()
    )
}
