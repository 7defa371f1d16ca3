//! # Terminal Output
//!
//! Helpers for what the CLI prints: colour decisions, the highlighted
//! "update available" notice and the per-package spinner.
//!
//! Colour follows the `--color` flag first. In `auto` mode the usual
//! environment conventions apply:
//! - `NO_COLOR` (any value) disables colour
//! - `CLICOLOR=0` disables colour
//! - `CLICOLOR_FORCE` (non-empty, not `0`) forces colour on
//! - `TERM=dumb` disables colour
//! - otherwise colour is used when stdout is a terminal

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

/// Output configuration for colours, emoji and spinners.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Whether a spinner may be drawn while a package is being cloned.
    pub interactive: bool,
}

impl OutputConfig {
    /// Build the configuration from the `--color` flag value
    /// (`always`, `never` or `auto`) and the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => color_from_env(),
        };
        let interactive = console::Term::stdout().is_term();
        Self {
            use_color,
            interactive,
        }
    }

    /// Plain output: no colour, no spinner.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            interactive: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn color_from_env() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}

/// Picks the emoji when colour is on and the plain marker otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// The line announcing that upstream has moved past the locked revision.
pub fn update_notice(config: &OutputConfig, name: &str) -> String {
    let text = format!("{} has a new update!", name);
    if config.use_color {
        style(text).blue().bold().force_styling(true).to_string()
    } else {
        format!("[UPDATE] {}", text)
    }
}

/// Shortens a commit identifier for display.
pub fn short_revision(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}

/// Starts a spinner for a package being processed, or returns `None` when
/// output is not going to a terminal.
pub fn package_spinner(config: &OutputConfig, name: &str) -> Option<ProgressBar> {
    if !config.interactive {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(format!("Processing {}...", name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
