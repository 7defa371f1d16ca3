//! # Synchronizer
//!
//! This module drives the vendoring run. [`Synchronizer::integrate`] performs
//! the per-package procedure:
//!
//! 1. **Reset**: delete any working copy left over from a previous run.
//! 2. **Fetch**: clone the package source into `<root>/<name>`.
//! 3. **Resolve**: read the revision the clone landed on.
//! 4. **Reconcile**: a package already in the lock is checked out at its
//!    locked revision (noting when upstream has moved on). A new package
//!    adopts the fresh revision as its lock entry.
//! 5. **Prune**: delete every top-level entry outside the retain set.
//!
//! [`Synchronizer::execute`] wraps that in the full run: load the
//! configuration and lock, integrate every package in declaration order,
//! rebuild the manifest and write both files. The lock is threaded through as
//! an explicit `&mut` value and only written once all packages are done, so a
//! failed run never leaves a half-updated lock behind.

use crate::config::{self, Config, Package};
use crate::defaults::{resolve_in_root, CONFIG_FILE_NAME, LOCK_FILE_NAME, MANIFEST_FILE_NAME};
use crate::error::{Error, Result};
use crate::lock::LockFile;
use crate::manifest::{Manifest, ManifestLayout};
use crate::prune;
use crate::repository::{GitOperations, SystemGit};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// How a package's revision was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The package had no lock entry; the cloned revision was recorded.
    Adopted,
    /// The package was checked out at its locked revision.
    ///
    /// `upstream` holds the freshly cloned head when it differs from the lock.
    Pinned { upstream: Option<String> },
}

/// What happened to one package during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub name: String,
    /// Revision the working copy ended on, always equal to the lock entry.
    pub revision: String,
    pub resolution: Resolution,
    /// Top-level entries deleted by pruning, sorted.
    pub removed: Vec<String>,
}

impl PackageOutcome {
    /// The newer upstream revision, if the lock is behind.
    pub fn update_available(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Pinned {
                upstream: Some(head),
            } => Some(head),
            _ => None,
        }
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    Started(&'a Package),
    Finished(&'a PackageOutcome),
}

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Integrated packages in processing order.
    pub outcomes: Vec<PackageOutcome>,
    /// Declared packages left alone because of a package filter.
    pub skipped: Vec<String>,
    /// Entries written to the manifest.
    pub manifest_entries: usize,
}

impl SyncReport {
    pub fn updates_available(&self) -> impl Iterator<Item = &PackageOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.update_available().is_some())
    }
}

/// Files and options for [`Synchronizer::execute`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub config_path: PathBuf,
    pub lock_path: PathBuf,
    pub manifest_path: PathBuf,
    pub layout: ManifestLayout,
    /// When non-empty, only these packages are integrated.
    pub only: Vec<String>,
}

impl SyncOptions {
    /// The well-known file names inside `root`.
    pub fn in_root(root: &Path) -> Self {
        Self {
            config_path: resolve_in_root(root, None, CONFIG_FILE_NAME),
            lock_path: resolve_in_root(root, None, LOCK_FILE_NAME),
            manifest_path: resolve_in_root(root, None, MANIFEST_FILE_NAME),
            layout: ManifestLayout::default(),
            only: Vec::new(),
        }
    }
}

/// Integrates packages into working copies under a root directory.
pub struct Synchronizer {
    root: PathBuf,
    git_ops: Box<dyn GitOperations>,
}

impl Synchronizer {
    /// Creates a synchronizer that uses the system `git` binary.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_operations(root, Box::new(SystemGit))
    }

    /// Creates a synchronizer with a custom `GitOperations` implementation.
    pub fn with_operations(root: impl Into<PathBuf>, git_ops: Box<dyn GitOperations>) -> Self {
        Self {
            root: root.into(),
            git_ops,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the working copy of `name`.
    pub fn working_copy(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Runs the integration procedure for a single package.
    ///
    /// On success the working copy is at the revision recorded in `lock` and
    /// contains only retained entries.
    pub fn integrate(&self, package: &Package, lock: &mut LockFile) -> Result<PackageOutcome> {
        let name = package.name.as_str();
        let dir = self.working_copy(name);

        prune::reset_working_copy(name, &dir)?;
        self.git_ops.clone_repo(name, &package.git, &dir)?;
        let fetched = self.git_ops.head_revision(&dir)?;
        debug!("{}: cloned {} at {}", name, package.git, fetched);

        let (revision, resolution) = match lock.get(name) {
            Some(locked) => {
                let locked = locked.to_string();
                let upstream = (locked != fetched).then(|| fetched.clone());
                if upstream.is_some() {
                    info!("{}: upstream is at {}, lock pins {}", name, fetched, locked);
                }
                self.git_ops.checkout(name, &dir, &locked)?;
                (locked, Resolution::Pinned { upstream })
            }
            None => {
                lock.pin(name, &fetched);
                info!("{}: pinned to {}", name, fetched);
                (fetched, Resolution::Adopted)
            }
        };

        let removed = prune::prune(name, &dir, &prune::retain_set(&package.keep))?;

        Ok(PackageOutcome {
            name: name.to_string(),
            revision,
            resolution,
            removed,
        })
    }

    /// Integrates every package declared in `config`, top-level packages each
    /// followed by their nested packages.
    ///
    /// With a non-empty `only`, packages not named there are skipped and keep
    /// whatever lock entry they had. Naming an undeclared package is an error.
    pub fn run(
        &self,
        config: &Config,
        lock: &mut LockFile,
        only: &[String],
        on_event: &mut dyn FnMut(SyncEvent<'_>),
    ) -> Result<SyncReport> {
        if let Some(unknown) = only.iter().find(|name| config.find(name).is_none()) {
            return Err(Error::ConfigParse {
                message: format!("Package '{}' is not declared in the configuration", unknown),
                hint: None,
            });
        }

        let mut report = SyncReport::default();
        for entry in config.entries() {
            let package = entry.package;
            if !only.is_empty() && !only.contains(&package.name) {
                debug!("{}: skipped", package.name);
                report.skipped.push(package.name.clone());
                continue;
            }

            on_event(SyncEvent::Started(package));
            let outcome = self.integrate(package, lock)?;
            on_event(SyncEvent::Finished(&outcome));
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Rejects packages whose working copy would land on the config, lock or
    /// manifest file.
    fn check_project_files(&self, config: &Config, options: &SyncOptions) -> Result<()> {
        let project_files = [
            &options.config_path,
            &options.lock_path,
            &options.manifest_path,
        ];
        for entry in config.entries() {
            let dir = self.working_copy(&entry.package.name);
            if let Some(file) = project_files.iter().find(|file| ***file == dir) {
                return Err(Error::ConfigParse {
                    message: format!(
                        "Package '{}' would be cloned over {}",
                        entry.package.name,
                        file.display()
                    ),
                    hint: Some("Rename the package, or move the file with --config, --lock or --manifest".to_string()),
                });
            }
        }
        Ok(())
    }

    /// Full run: load configuration and lock, integrate, then write the
    /// manifest and the lock.
    ///
    /// Nothing is written if any package fails. The manifest is written
    /// before the lock, so a failed manifest write leaves the lock untouched.
    pub fn execute(
        &self,
        options: &SyncOptions,
        on_event: &mut dyn FnMut(SyncEvent<'_>),
    ) -> Result<SyncReport> {
        let config = config::from_file(&options.config_path)?;
        self.check_project_files(&config, options)?;
        let mut lock = LockFile::load(&options.lock_path)?;
        lock.warn_stale_entries(&config);

        let mut report = self.run(&config, &mut lock, &options.only, on_event)?;

        let manifest = Manifest::from_config(&config, options.layout);
        let manifest_yaml = manifest.to_yaml()?;
        let lock_yaml = lock.to_yaml()?;
        // The lock is written last
        fs::write(&options.manifest_path, manifest_yaml)?;
        fs::write(&options.lock_path, lock_yaml)?;
        report.manifest_entries = manifest.len();

        info!(
            "wrote {} and {}",
            options.lock_path.display(),
            options.manifest_path.display()
        );
        Ok(report)
    }
}
