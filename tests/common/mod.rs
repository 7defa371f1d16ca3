//! Shared test utilities for E2E tests.
//!
//! This module provides the project fixture and the local upstream
//! repositories the CLI tests sync from, so no test needs the network.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let upstream = UpstreamRepo::new();
//!     let fixture = TestFixture::new().with_config(&upstream.config_for("foo"));
//!     fixture.command().arg("sync").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
    #[allow(unused_imports)]
    pub use super::UpstreamRepo;
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Two top-level packages, the first with a nested dependency.
    pub const NESTED: &str = r#"
foo:
  git: https://example.com/foo.git
  keep: [example/]
  dependencies:
    bar:
      git: https://example.com/bar.git
baz:
  git: https://example.com/baz.git
"#;

    /// A package declaration without a `git` key.
    pub const MISSING_GIT: &str = r#"
foo:
  keep: [example]
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: yaml: content:";

    /// Empty configuration (comments only).
    pub const EMPTY: &str = "# vendor-sync packages\n";
}

/// Whether a usable `git` binary is on the PATH.
///
/// Tests that sync real repositories return early when it is not.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[allow(dead_code)]
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local git repository standing in for a package's upstream.
///
/// The initial commit holds the usual package layout: `lib/`, `test/`,
/// `LICENSE` and `pubspec.yaml`, plus `README.md` and `example/` which are
/// pruned unless kept.
#[allow(dead_code)]
pub struct UpstreamRepo {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl UpstreamRepo {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        for (path, content) in [
            ("lib/main.dart", "void main() {}\n"),
            ("test/main_test.dart", "void main() {}\n"),
            ("LICENSE", "MIT\n"),
            ("pubspec.yaml", "name: upstream\n"),
            ("README.md", "# upstream\n"),
            ("example/demo.dart", "void demo() {}\n"),
        ] {
            temp_dir
                .child(path)
                .write_str(content)
                .expect("Failed to write upstream file");
        }

        git(temp_dir.path(), &["init", "--quiet"]);
        git(temp_dir.path(), &["add", "."]);
        git(temp_dir.path(), &["commit", "--quiet", "-m", "initial"]);
        Self { temp_dir }
    }

    /// The clone URL; a plain local path.
    pub fn url(&self) -> String {
        self.temp_dir.path().to_string_lossy().into_owned()
    }

    pub fn head(&self) -> String {
        git(self.temp_dir.path(), &["rev-parse", "HEAD"])
    }

    /// Commits a new file and returns the new head revision.
    pub fn commit_file(&self, path: &str, content: &str) -> String {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write upstream file");
        git(self.temp_dir.path(), &["add", "."]);
        git(self.temp_dir.path(), &["commit", "--quiet", "-m", path]);
        self.head()
    }

    /// A single-package config pointing `name` at this repository.
    pub fn config_for(&self, name: &str) -> String {
        format!("{}:\n  git: '{}'\n", name, self.url())
    }
}

/// A test fixture that provides a temporary project root with optional config.
///
/// The temp directory is the sync root: `config.yaml`, the lock file, the
/// manifest and every working copy live directly inside it.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_config(configs::NESTED);
///
/// fixture.command().arg("validate").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `config.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("config.yaml", content)
    }

    /// Add a `config.lock.yaml` with the given content.
    #[allow(dead_code)]
    pub fn with_lock(self, content: &str) -> Self {
        self.with_file("config.lock.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.yaml")
    }

    #[allow(dead_code)]
    pub fn lock_path(&self) -> PathBuf {
        self.path().join("config.lock.yaml")
    }

    #[allow(dead_code)]
    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("pubspec.yaml")
    }

    /// Read a file relative to the fixture root.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// The root-related environment variables are cleared so the caller's
    /// shell cannot redirect the run.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("vendor-sync");
        cmd.current_dir(self.path())
            .env_remove("VENDOR_SYNC_ROOT")
            .env_remove("VENDOR_SYNC_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::NESTED);
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::NESTED, configs::MISSING_GIT, configs::EMPTY] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
