//! Data directory resolution.

use std::env;
use std::path::PathBuf;

/// Directory name used under the platform data root.
pub const APP_DIR_NAME: &str = "hostkit";

/// Returns the directory hostkit writes trace files to.
///
/// Resolution order: `$XDG_DATA_HOME/hostkit`, then
/// `$HOME/.local/share/hostkit`, then `hostkit` under the system temp
/// directory. Empty variables are treated as unset. The directory is not
/// created.
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

fn resolve_data_dir(
    xdg_data_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> PathBuf {
    let non_empty = |v: std::ffi::OsString| (!v.is_empty()).then(|| PathBuf::from(v));
    xdg_data_home
        .and_then(non_empty)
        .or_else(|| home.and_then(non_empty).map(|h| h.join(".local").join("share")))
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
}
