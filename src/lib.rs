//! # vendor-sync
//!
//! This library vendors external git repositories into a project. Each
//! declared package is cloned into a directory named after it, pinned to the
//! revision recorded in a lock file, stripped down to the entries worth
//! keeping, and listed in a generated manifest for the consuming build
//! system. It backs the `vendor-sync` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use vendor_sync::config;
//! use vendor_sync::manifest::{Manifest, ManifestLayout};
//!
//! let config = config::parse(r#"
//! foo:
//!   git: https://example.com/foo.git
//!   keep: [example/]
//!   dependencies:
//!     bar:
//!       git: https://example.com/bar.git
//! "#).unwrap();
//!
//! assert_eq!(config.len(), 2);
//!
//! let manifest = Manifest::from_config(&config, ManifestLayout::Overrides);
//! assert_eq!(manifest.get("bar").unwrap().path, "./dependencies/bar");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the package declarations in `config.yaml`.
//! - **Lock (`lock`)**: pinned revisions in `config.lock.yaml`, the only state
//!   carried from one run to the next.
//! - **Manifest (`manifest`)**: the generated `pubspec.yaml` mapping every
//!   package to `./dependencies/<name>`.
//! - **Synchronizer (`sync`)**: the per-package reset, clone, reconcile and
//!   prune procedure, plus the full run around it.
//! - **Git (`git`, `repository`)**: the `git` subprocess calls and the trait
//!   that lets tests replace them.
//!
//! ## Execution Flow
//!
//! 1. Load the configuration (fatal if missing or invalid) and the lock
//!    (empty if missing).
//! 2. For each top-level package and each of its nested packages, run the
//!    integration procedure.
//! 3. Rebuild the manifest from the configuration.
//! 4. Write the lock and the manifest with sorted keys.

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod lock;
pub mod manifest;
pub mod output;
pub mod prune;
pub mod repository;
pub mod sync;
