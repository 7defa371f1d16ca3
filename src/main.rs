//! # vendor-sync CLI
//!
//! Binary entry point for the `vendor-sync` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and colour handling.
//! - Running the selected command and turning errors into a non-zero exit.
//!
//! The actual work lives in the `vendor_sync` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
