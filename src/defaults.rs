//! Default values for vendor-sync.
//!
//! This module centralizes the well-known file names and fixed sets used
//! across the library and the CLI.

use std::path::{Path, PathBuf};

/// Name of the package declaration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the lock file recording pinned revisions.
pub const LOCK_FILE_NAME: &str = "config.lock.yaml";

/// Name of the generated manifest for the consuming build system.
pub const MANIFEST_FILE_NAME: &str = "pubspec.yaml";

/// Directory prefix used for manifest path entries.
pub const MANIFEST_PATH_PREFIX: &str = "./dependencies";

/// Top-level entries kept in every working copy, whatever the package declares.
pub const BASE_RETAINED: [&str; 4] = ["lib", "test", "LICENSE", "pubspec.yaml"];

/// Returns the path written into the manifest for a vendored package.
pub fn manifest_path_for(name: &str) -> String {
    format!("{}/{}", MANIFEST_PATH_PREFIX, name)
}

/// Resolves `path` against `root` unless it is already absolute.
///
/// Falls back to `<root>/<default_name>` when no path was given.
pub fn resolve_in_root(root: &Path, path: Option<&Path>, default_name: &str) -> PathBuf {
    match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => root.join(default_name),
    }
}
