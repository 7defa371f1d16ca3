//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `vendor-sync` command-line tool, one file per command.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `vendor_sync` library.
//!
//! Options shared by every command that reads the project files live in
//! [`ProjectArgs`].

pub mod completions;
pub mod sync;
pub mod tree;
pub mod validate;

use clap::Args;
use std::path::PathBuf;
use vendor_sync::defaults::{resolve_in_root, CONFIG_FILE_NAME, LOCK_FILE_NAME};

/// Where the working copies and project files live.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Directory holding the working copies. The config, lock and manifest
    /// files are looked up here unless given as absolute paths.
    #[arg(short, long, value_name = "DIR", env = "VENDOR_SYNC_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Package declaration file
    #[arg(short, long, value_name = "FILE", env = "VENDOR_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lock file recording pinned revisions
    #[arg(short, long, value_name = "FILE")]
    pub lock: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn config_path(&self) -> PathBuf {
        resolve_in_root(&self.root, self.config.as_deref(), CONFIG_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        resolve_in_root(&self.root, self.lock.as_deref(), LOCK_FILE_NAME)
    }
}
