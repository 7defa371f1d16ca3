//! # Package Declarations
//!
//! This module defines the in-memory form of `config.yaml` and the logic for
//! parsing and validating it.
//!
//! ## File Shape
//!
//! The file is a mapping from package name to a declaration:
//!
//! ```yaml
//! libsignal_protocol_dart:
//!   git: https://github.com/example/libsignal_protocol_dart.git
//!   keep:
//!     - analysis_options.yaml
//!   dependencies:
//!     curve25519:
//!       git: https://github.com/example/curve25519.git
//! ```
//!
//! - `git` (required): source location handed to `git clone`.
//! - `keep` (optional): extra top-level entries to retain after pruning.
//! - `dependencies` (optional): nested packages, one level deep only.
//!
//! The package name doubles as the working copy's directory name, so names are
//! validated before anything touches the disk.
//!
//! ## Parsing
//!
//! Parsing goes through raw `serde_yaml::Value` mappings rather than a derived
//! struct so that declaration order is preserved and each problem can be
//! reported with the package it belongs to.

use crate::error::{Error, Result};
use log::warn;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A single package declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name, also the working copy directory name.
    pub name: String,
    /// Source location passed to `git clone`.
    pub git: String,
    /// Extra top-level entries to keep, as written in the file.
    pub keep: Vec<String>,
    /// Nested packages declared under `dependencies`.
    ///
    /// Always empty for nested packages themselves.
    pub dependencies: Vec<Package>,
}

impl Package {
    /// Creates a declaration with no `keep` list and no nested packages.
    pub fn new(name: impl Into<String>, git: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            git: git.into(),
            keep: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

/// Where a package was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// Declared at the top level of the file.
    TopLevel,
    /// Declared under the `dependencies` of the named parent.
    Nested { parent: &'a str },
}

/// A package together with where it was declared.
#[derive(Debug, Clone, Copy)]
pub struct PackageEntry<'a> {
    pub package: &'a Package,
    pub placement: Placement<'a>,
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Top-level packages in file order.
    pub packages: Vec<Package>,
}

impl Config {
    /// Every declaration in processing order: each top-level package followed
    /// by its nested packages. Names declared more than once are yielded only
    /// at their first occurrence.
    pub fn entries(&self) -> Vec<PackageEntry<'_>> {
        let mut seen = std::collections::HashSet::new();
        let mut entries = Vec::new();

        for package in &self.packages {
            if seen.insert(package.name.as_str()) {
                entries.push(PackageEntry {
                    package,
                    placement: Placement::TopLevel,
                });
            }
            for nested in &package.dependencies {
                if seen.insert(nested.name.as_str()) {
                    entries.push(PackageEntry {
                        package: nested,
                        placement: Placement::Nested {
                            parent: &package.name,
                        },
                    });
                }
            }
        }

        entries
    }

    /// Looks up a declaration by name, top-level or nested.
    pub fn find(&self, name: &str) -> Option<&Package> {
        self.entries()
            .into_iter()
            .map(|entry| entry.package)
            .find(|package| package.name == name)
    }

    /// Returns true if `name` is declared at the top level.
    pub fn is_top_level(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p.name == name)
    }

    /// Number of distinct package names declared anywhere.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Parses a YAML string into a [`Config`].
pub fn parse(yaml_content: &str) -> Result<Config> {
    if yaml_content.trim().is_empty() {
        return Ok(Config::default());
    }

    let value: Value = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: format!("Invalid YAML: {}", e),
        hint: None,
    })?;

    let map = match value {
        Value::Null => return Ok(Config::default()),
        Value::Mapping(map) => map,
        _ => {
            return Err(Error::ConfigParse {
                message: "Expected a mapping of package names to declarations".to_string(),
                hint: Some("Start each package with '<name>:' at the top level".to_string()),
            })
        }
    };

    let mut packages = Vec::with_capacity(map.len());
    for (key, value) in map {
        let name = package_name(key)?;
        packages.push(convert_package(name, value, true)?);
    }

    let config = Config { packages };
    check_duplicates(&config)?;
    Ok(config)
}

/// Reads and parses a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("Cannot read {}: {}", path.display(), e),
        hint: if e.kind() == std::io::ErrorKind::NotFound {
            Some("Create the file or pass --config <FILE>".to_string())
        } else {
            None
        },
    })?;
    parse(&content)
}

fn package_name(key: Value) -> Result<String> {
    let name = match key {
        Value::String(s) => s,
        other => {
            return Err(Error::ConfigParse {
                message: format!("Package names must be strings, found {:?}", other),
                hint: None,
            })
        }
    };

    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(Error::ConfigParse {
            message: format!("Invalid package name '{}'", name),
            hint: Some("Package names are used as directory names and may not contain path separators".to_string()),
        });
    }

    Ok(name)
}

fn convert_package(name: String, value: Value, allow_nested: bool) -> Result<Package> {
    let mut map = match value {
        Value::Mapping(m) => m,
        _ => {
            return Err(Error::ConfigParse {
                message: format!("Package '{}' must be a mapping", name),
                hint: Some(format!("Write '{}:' followed by an indented 'git: <url>'", name)),
            })
        }
    };

    let git = match map.remove(Value::String("git".to_string())) {
        Some(Value::String(url)) if !url.trim().is_empty() => url,
        Some(_) => {
            return Err(Error::ConfigParse {
                message: format!("Package '{}' has an invalid 'git' value", name),
                hint: Some("'git' must be a non-empty string".to_string()),
            })
        }
        None => {
            return Err(Error::ConfigParse {
                message: format!("Package '{}' is missing 'git'", name),
                hint: Some("Add 'git: <url>' to the package".to_string()),
            })
        }
    };

    let keep = match map.remove(Value::String("keep".to_string())) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => {
            let keep: Vec<String> =
                serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
                    message: format!("Package '{}' has an invalid 'keep' list: {}", name, e),
                    hint: Some("'keep' must be a list of file or directory names".to_string()),
                })?;
            for entry in &keep {
                let trimmed = entry.trim_end_matches(['/', '\\']);
                if trimmed.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!("Package '{}' has an empty 'keep' entry", name),
                        hint: None,
                    });
                }
                if trimmed.contains('/') {
                    warn!(
                        "{}: keep entry '{}' is not a top-level name and will not match anything",
                        name, entry
                    );
                }
            }
            keep
        }
    };

    let dependencies = match map.remove(Value::String("dependencies".to_string())) {
        None | Some(Value::Null) => Vec::new(),
        Some(_) if !allow_nested => {
            return Err(Error::ConfigParse {
                message: format!("Nested package '{}' declares its own dependencies", name),
                hint: Some("Only one level of nesting is supported; move them to the top level".to_string()),
            })
        }
        Some(Value::Mapping(nested)) => convert_nested(&name, nested)?,
        Some(_) => {
            return Err(Error::ConfigParse {
                message: format!("'dependencies' of package '{}' must be a mapping", name),
                hint: None,
            })
        }
    };

    for (key, _) in map {
        warn!("{}: ignoring unknown key {:?}", name, key);
    }

    Ok(Package {
        name,
        git,
        keep,
        dependencies,
    })
}

fn convert_nested(parent: &str, nested: Mapping) -> Result<Vec<Package>> {
    let mut packages = Vec::with_capacity(nested.len());
    for (key, value) in nested {
        let name = package_name(key)?;
        let package = convert_package(name, value, false).map_err(|e| match e {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("{} (under '{}')", message, parent),
                hint,
            },
            other => other,
        })?;
        packages.push(package);
    }
    Ok(packages)
}

/// A name may be declared several times only if every declaration agrees on
/// the source. Only the first declaration's `keep` list is used.
fn check_duplicates(config: &Config) -> Result<()> {
    let mut seen: HashMap<&str, &Package> = HashMap::new();
    let all = config
        .packages
        .iter()
        .flat_map(|p| std::iter::once(p).chain(p.dependencies.iter()));

    for package in all {
        match seen.get(package.name.as_str()) {
            Some(existing) if existing.git != package.git => {
                return Err(Error::ConfigParse {
                    message: format!(
                        "Package '{}' is declared with conflicting sources: {} and {}",
                        package.name, existing.git, package.git
                    ),
                    hint: Some("Every declaration of a package must use the same 'git' source".to_string()),
                });
            }
            Some(existing) => {
                if keep_names(&existing.keep) != keep_names(&package.keep) {
                    warn!(
                        "{}: declared again with keep [{}]; using the first declaration's keep [{}]",
                        package.name,
                        package.keep.join(", "),
                        existing.keep.join(", ")
                    );
                }
            }
            None => {
                seen.insert(&package.name, package);
            }
        }
    }

    Ok(())
}

fn keep_names(keep: &[String]) -> BTreeSet<&str> {
    keep.iter()
        .map(|entry| entry.trim_end_matches(['/', '\\']))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
foo:
  git: https://example.com/foo.git
bar:
  git: https://example.com/bar.git
  keep:
    - README.md
    - example/
"#;

        let config = parse(yaml).unwrap();
        assert_eq!(config.packages.len(), 2);
        assert_eq!(config.packages[0], Package::new("foo", "https://example.com/foo.git"));
        assert_eq!(config.packages[1].name, "bar");
        assert_eq!(config.packages[1].keep, vec!["README.md", "example/"]);
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let yaml = r#"
zeta:
  git: z
alpha:
  git: a
  dependencies:
    omega:
      git: o
    beta:
      git: b
middle:
  git: m
"#;

        let config = parse(yaml).unwrap();
        let names: Vec<&str> = config
            .entries()
            .iter()
            .map(|e| e.package.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "omega", "beta", "middle"]);
    }

    #[test]
    fn test_parse_nested_dependencies() {
        let yaml = r#"
parent:
  git: https://example.com/parent.git
  dependencies:
    child:
      git: https://example.com/child.git
      keep: [CHANGELOG.md]
"#;

        let config = parse(yaml).unwrap();
        let entries = config.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].placement, Placement::TopLevel);
        assert_eq!(entries[1].package.name, "child");
        assert_eq!(entries[1].package.keep, vec!["CHANGELOG.md"]);
        assert_eq!(entries[1].placement, Placement::Nested { parent: "parent" });
        assert!(config.is_top_level("parent"));
        assert!(!config.is_top_level("child"));
        assert!(config.find("child").is_some());
    }

    #[test]
    fn test_parse_empty_config() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# nothing vendored yet\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_null_keep_and_dependencies() {
        let yaml = r#"
foo:
  git: https://example.com/foo.git
  keep:
  dependencies:
"#;
        let config = parse(yaml).unwrap();
        assert!(config.packages[0].keep.is_empty());
        assert!(config.packages[0].dependencies.is_empty());
    }

    #[test]
    fn test_parse_rejects_sequence_root() {
        let err = parse("- foo\n- bar\n").unwrap_err();
        assert!(err.to_string().contains("Expected a mapping"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse("foo:\n  git: [unclosed\n");
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_parse_missing_git() {
        let err = parse("foo:\n  keep: [lib]\n").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("Package 'foo' is missing 'git'"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_parse_git_must_be_string() {
        let err = parse("foo:\n  git: [a, b]\n").unwrap_err();
        assert!(err.to_string().contains("invalid 'git' value"));
    }

    #[test]
    fn test_parse_keep_must_be_list_of_strings() {
        let err = parse("foo:\n  git: x\n  keep: {a: b}\n").unwrap_err();
        assert!(err.to_string().contains("invalid 'keep' list"));
    }

    #[test]
    fn test_parse_rejects_empty_keep_entry() {
        let err = parse("foo:\n  git: x\n  keep: ['/']\n").unwrap_err();
        assert!(err.to_string().contains("empty 'keep' entry"));
    }

    #[test]
    fn test_parse_rejects_path_like_names() {
        for name in ["'../escape'", "'a/b'", "'.'", "'..'", "''"] {
            let yaml = format!("{}:\n  git: x\n", name);
            let err = parse(&yaml).unwrap_err();
            assert!(
                err.to_string().contains("Invalid package name"),
                "name {} was accepted",
                name
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_string_names() {
        let err = parse("42:\n  git: x\n").unwrap_err();
        assert!(err.to_string().contains("must be strings"));
    }

    #[test]
    fn test_parse_rejects_second_level_nesting() {
        let yaml = r#"
a:
  git: a
  dependencies:
    b:
      git: b
      dependencies:
        c:
          git: c
"#;
        let err = parse(yaml).unwrap_err();
        let display = err.to_string();
        assert!(display.contains("Nested package 'b' declares its own dependencies"));
        assert!(display.contains("under 'a'"));
    }

    #[test]
    fn test_shared_nested_dependency_is_listed_once() {
        let yaml = r#"
a:
  git: a
  dependencies:
    shared:
      git: s
b:
  git: b
  dependencies:
    shared:
      git: s
"#;
        let config = parse(yaml).unwrap();
        let names: Vec<&str> = config
            .entries()
            .iter()
            .map(|e| e.package.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "shared", "b"]);
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_conflicting_sources_are_rejected() {
        let yaml = r#"
a:
  git: a
  dependencies:
    shared:
      git: one
b:
  git: b
  dependencies:
    shared:
      git: two
"#;
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("conflicting sources"));
    }

    #[test]
    fn test_duplicate_with_different_keep_warns() {
        testing_logger::setup();
        let yaml = r#"
a:
  git: a
  dependencies:
    shared:
      git: s
      keep: [example/]
b:
  git: b
  dependencies:
    shared:
      git: s
      keep: [doc]
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.find("shared").unwrap().keep, vec!["example/"]);

        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 1);
            assert_eq!(captured_logs[0].level, log::Level::Warn);
            assert!(captured_logs[0].body.contains("shared"));
            assert!(captured_logs[0].body.contains("keep [doc]"));
        });
    }

    #[test]
    fn test_duplicate_with_equivalent_keep_is_silent() {
        testing_logger::setup();
        let yaml = r#"
a:
  git: a
  dependencies:
    shared:
      git: s
      keep: [example/, doc]
b:
  git: b
  dependencies:
    shared:
      git: s
      keep: [doc, example]
"#;
        parse(yaml).unwrap();

        testing_logger::validate(|captured_logs| {
            assert!(captured_logs.is_empty());
        });
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_file("/nonexistent/config.yaml").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("/nonexistent/config.yaml"));
        assert!(display.contains("--config"));
    }

    #[test]
    fn test_from_file_reads_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "foo:\n  git: https://example.com/foo.git\n").unwrap();

        let config = from_file(&path).unwrap();
        assert_eq!(config.packages.len(), 1);
    }
}
