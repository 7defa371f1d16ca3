//! # Error Handling
//!
//! This module defines the centralized error type for `vendor-sync`. It uses
//! the `thiserror` library to build an `Error` enum covering every failure the
//! synchronizer can hit, each carrying enough context (package name, URL,
//! path, git's own diagnostic text) to explain what went wrong.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant maps to one class of failure:
//!   configuration, lock file, clone, other git commands, checkout, pruning,
//!   plus wrapped I/O and YAML errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! Every variant is fatal for the run. The "update available" notice is not an
//! error and is reported through [`crate::sync::PackageOutcome`] instead.

use thiserror::Error;

/// Main error type for vendor-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file is missing, malformed or declares something
    /// the synchronizer cannot act on.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The lock file exists but could not be understood.
    #[error("Lock file error: {message}")]
    LockParse { message: String },

    /// `git clone` failed for a package source.
    #[error("Git clone error for {name} ({url}): {message}")]
    GitClone {
        name: String,
        url: String,
        message: String,
    },

    /// A git command other than clone or checkout failed, or git could not be
    /// started at all.
    #[error("Git command failed in {path}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// The working copy could not be moved to its locked revision.
    #[error("Git checkout of locked revision {revision} failed for {name}: {message}")]
    GitCheckout {
        name: String,
        revision: String,
        message: String,
    },

    /// An entry of a working copy could not be removed.
    #[error("Failed to remove {path} from {name}: {message}")]
    Prune {
        name: String,
        path: String,
        message: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
