//! Thin wrappers around the system `git` binary.
//!
//! Using the installed client means SSH keys, credential helpers and any
//! authentication configured in `~/.gitconfig` all work as they would on the
//! command line. Every call blocks until git exits.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::Error;
use log::debug;

fn run(args: &[&str], cwd: Option<&Path>) -> std::io::Result<Output> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    debug!("running git {} (in {:?})", args.join(" "), cwd);
    command.output()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Clone `url` into `target_dir`.
///
/// The parent of `target_dir` is created if needed. `target_dir` itself must
/// not exist or be empty; the caller is responsible for resetting it.
pub fn clone(name: &str, url: &str, target_dir: &Path) -> Result<(), Error> {
    if let Some(parent) = target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let target = target_dir.to_string_lossy();
    let output = run(&["clone", "--quiet", "--", url, &target], None).map_err(|e| Error::GitClone {
        name: name.to_string(),
        url: url.to_string(),
        message: format!("failed to run git: {}", e),
    })?;

    if !output.status.success() {
        let stderr = stderr_of(&output);

        // Common auth failures get a pointer to the usual fixes
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository \
                (SSH key in ssh-agent, git credentials or a personal access token).\n\
                Error: {}",
                stderr
            )
        } else {
            stderr
        };

        return Err(Error::GitClone {
            name: name.to_string(),
            url: url.to_string(),
            message,
        });
    }

    Ok(())
}

/// Return the commit identifier `HEAD` points at in `repo_dir`.
pub fn head_revision(repo_dir: &Path) -> Result<String, Error> {
    let command_error = |stderr: String| Error::GitCommand {
        command: "rev-parse HEAD".to_string(),
        path: repo_dir.display().to_string(),
        stderr,
    };

    let output = run(&["rev-parse", "HEAD"], Some(repo_dir)).map_err(|e| command_error(e.to_string()))?;
    if !output.status.success() {
        return Err(command_error(stderr_of(&output)));
    }

    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if revision.is_empty() {
        return Err(command_error("git printed no revision".to_string()));
    }
    Ok(revision)
}

/// Check out `revision` in `repo_dir`, leaving a detached `HEAD`.
pub fn checkout(name: &str, repo_dir: &Path, revision: &str) -> Result<(), Error> {
    if revision.starts_with('-') {
        return Err(Error::GitCheckout {
            name: name.to_string(),
            revision: revision.to_string(),
            message: "revision may not start with '-'".to_string(),
        });
    }

    let output = run(&["checkout", "--quiet", revision], Some(repo_dir)).map_err(|e| {
        Error::GitCheckout {
            name: name.to_string(),
            revision: revision.to_string(),
            message: e.to_string(),
        }
    })?;

    if !output.status.success() {
        return Err(Error::GitCheckout {
            name: name.to_string(),
            revision: revision.to_string(),
            message: stderr_of(&output),
        });
    }

    Ok(())
}

/// Returns true if a `git` binary can be started.
pub fn is_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
