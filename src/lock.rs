//! Lock file recording the revision each package is pinned to.
//!
//! The lock is a flat YAML mapping from package name to commit identifier.
//! It is the only state carried between runs: a package that has an entry is
//! always checked out at that revision, and a package without one adopts
//! whatever the fresh clone produced.

use crate::config::Config;
use crate::error::{Error, Result};
use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Pinned revisions keyed by package name.
///
/// Backed by a `BTreeMap` so that serialization is sorted and stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFile {
    entries: BTreeMap<String, String>,
}

impl LockFile {
    /// Loads the lock file at `path`.
    ///
    /// A missing or empty file means no package has been pinned yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::LockParse { message } => Error::LockParse {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parses lock file content.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries: Option<BTreeMap<String, String>> =
            serde_yaml::from_str(content).map_err(|e| Error::LockParse {
                message: e.to_string(),
            })?;
        let entries = entries.unwrap_or_default();
        for (name, revision) in &entries {
            let malformed = revision.is_empty()
                || revision.starts_with('-')
                || revision.chars().any(char::is_whitespace);
            if malformed {
                return Err(Error::LockParse {
                    message: format!("'{}' is not a valid revision for {}", revision, name),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Serializes the lock with sorted keys.
    pub fn to_yaml(&self) -> Result<String> {
        if self.entries.is_empty() {
            return Ok("{}\n".to_string());
        }
        Ok(serde_yaml::to_string(&self.entries)?)
    }

    /// Writes the lock to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Records the revision for a package seen for the first time.
    ///
    /// Returns false and leaves the lock untouched if the package is already
    /// pinned: an existing entry is never overwritten.
    pub fn pin(&mut self, name: &str, revision: &str) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), revision.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names pinned in the lock that the configuration no longer declares.
    pub fn stale_entries<'a>(&'a self, config: &Config) -> Vec<&'a str> {
        self.entries
            .keys()
            .filter(|name| config.find(name).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Logs a warning for every stale entry. Stale entries are kept as they are.
    pub fn warn_stale_entries(&self, config: &Config) {
        for name in self.stale_entries(config) {
            warn!(
                "{} is pinned in the lock file but no longer declared; keeping its entry",
                name
            );
        }
    }
}
