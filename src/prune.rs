//! Trimming a fresh working copy down to the entries worth vendoring.

use crate::defaults::BASE_RETAINED;
use crate::error::{Error, Result};
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Top-level names kept in a working copy: the fixed base set plus the
/// package's own `keep` entries, with trailing separators stripped.
pub fn retain_set(keep: &[String]) -> BTreeSet<String> {
    BASE_RETAINED
        .iter()
        .map(|name| name.to_string())
        .chain(
            keep.iter()
                .map(|entry| entry.trim_end_matches(['/', '\\']).to_string()),
        )
        .filter(|name| !name.is_empty())
        .collect()
}

/// Deletes every immediate child of `dir` whose name is not in `retain`.
///
/// Directories are removed recursively, everything else directly. Returns the
/// removed names in sorted order.
pub fn prune(name: &str, dir: &Path, retain: &BTreeSet<String>) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if retain.contains(&file_name) {
            continue;
        }

        let path = entry.path();
        // file_type() does not follow symlinks, so a link to a directory is
        // removed as a file and its target is left alone
        let result = if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| Error::Prune {
            name: name.to_string(),
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!("{}: removed {}", name, file_name);
        removed.push(file_name);
    }

    removed.sort();
    Ok(removed)
}

/// Removes a leftover working copy so the next clone starts from nothing.
///
/// Only a real directory is removed. A file or symlink at `dir` is an error
/// and is left in place.
pub fn reset_working_copy(name: &str, dir: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(Error::Prune {
                name: name.to_string(),
                path: dir.display().to_string(),
                message: e.to_string(),
            })
        }
    };

    if !metadata.is_dir() {
        return Err(Error::Prune {
            name: name.to_string(),
            path: dir.display().to_string(),
            message: "not a directory, refusing to replace it".to_string(),
        });
    }

    fs::remove_dir_all(dir).map_err(|e| Error::Prune {
        name: name.to_string(),
        path: dir.display().to_string(),
        message: e.to_string(),
    })
}
