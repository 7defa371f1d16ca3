//! Generated manifest telling the consuming build system where each vendored
//! package lives.
//!
//! The manifest is a pure projection of the configuration: it is rebuilt from
//! scratch on every run and never read back.

use crate::config::Config;
use crate::defaults::manifest_path_for;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// How packages are distributed between manifest sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ManifestLayout {
    /// Every package goes under `dependency_overrides`.
    #[default]
    Overrides,
    /// Top-level packages go under `dependencies`, nested ones under
    /// `dependency_overrides`.
    Split,
}

/// A path dependency entry: `{ path: ./dependencies/<name> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDependency {
    pub path: String,
}

impl PathDependency {
    pub fn for_package(name: &str) -> Self {
        Self {
            path: manifest_path_for(name),
        }
    }
}

/// The manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, PathDependency>>,
    pub dependency_overrides: BTreeMap<String, PathDependency>,
}

impl Manifest {
    /// Builds the manifest for every package the configuration declares.
    ///
    /// A name declared both at the top level and as a nested package is
    /// treated as top-level, so each name appears exactly once.
    pub fn from_config(config: &Config, layout: ManifestLayout) -> Self {
        let mut manifest = Manifest {
            dependencies: match layout {
                ManifestLayout::Overrides => None,
                ManifestLayout::Split => Some(BTreeMap::new()),
            },
            dependency_overrides: BTreeMap::new(),
        };

        for entry in config.entries() {
            let name = entry.package.name.clone();
            let dependency = PathDependency::for_package(&name);
            match manifest.dependencies.as_mut() {
                Some(direct) if config.is_top_level(&name) => {
                    direct.insert(name, dependency);
                }
                _ => {
                    manifest.dependency_overrides.insert(name, dependency);
                }
            }
        }

        manifest
    }

    /// Looks a package up in whichever section holds it.
    pub fn get(&self, name: &str) -> Option<&PathDependency> {
        self.dependencies
            .as_ref()
            .and_then(|direct| direct.get(name))
            .or_else(|| self.dependency_overrides.get(name))
    }

    /// Total number of entries across both sections.
    pub fn len(&self) -> usize {
        self.dependencies.as_ref().map_or(0, BTreeMap::len) + self.dependency_overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
