//! # Tree Command Implementation
//!
//! Displays the declared packages as a hierarchy: each top-level package with
//! its nested packages underneath, annotated with the revision the lock file
//! pins it to.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::borrow::Cow;

use super::ProjectArgs;
use vendor_sync::config::{self, Config, Package};
use vendor_sync::lock::LockFile;
use vendor_sync::output::short_revision;

/// Display the declared packages as a tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let config_path = args.project.config_path();
    let lock_path = args.project.lock_path();

    let config = config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let lock = LockFile::load(&lock_path)
        .with_context(|| format!("Failed to load lock file {}", lock_path.display()))?;

    let root = build_tree(&config_path.display().to_string(), &config, &lock);
    print_tree(&root).context("Failed to display tree")?;
    Ok(())
}

fn build_tree(label: &str, config: &Config, lock: &LockFile) -> TreeNode {
    TreeNode {
        label: label.to_string(),
        children: config
            .packages
            .iter()
            .map(|package| TreeNode {
                label: package_label(package, lock),
                children: package
                    .dependencies
                    .iter()
                    .map(|nested| TreeNode {
                        label: package_label(nested, lock),
                        children: Vec::new(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn package_label(package: &Package, lock: &LockFile) -> String {
    let revision = lock
        .get(&package.name)
        .map(short_revision)
        .unwrap_or("unpinned");
    format!("{} @ {} ({})", package.name, revision, package.git)
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
