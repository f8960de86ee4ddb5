//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory below the user's config home.
const APP_DIR: &str = "wtmdb";

/// Resolves the config file path.
///
/// - `--dir` given: `{dir}/config.toml`.
/// - `$XDG_CONFIG_HOME` set and non-empty: `$XDG_CONFIG_HOME/wtmdb/config.toml`.
/// - Otherwise: `~/.config/wtmdb/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `--dir`, `XDG_CONFIG_HOME`, nor `HOME` is available.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    let home = config_home(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )?;
    Ok(home.join(APP_DIR).join(CONFIG_FILE))
}

/// Picks the user's config home from `XDG_CONFIG_HOME` and `HOME`.
fn config_home(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg));
    }
    let home = home
        .filter(|v| !v.is_empty())
        .context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home).join(".config"))
}
