//! Where configuration lives. A config file next to the executable wins,
//! so a copied tool folder carries its own settings.

use std::path::{Path, PathBuf};

/// File name looked up in each candidate directory.
pub const CONFIG_FILE_NAME: &str = "geolabel.json";

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Per-user configuration directory, if the platform has one.
pub fn user_config_directory() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "GeoLabel").map(|d| d.config_dir().to_path_buf())
}

/// Pick the configuration file to load.
///
/// An explicit path is used as-is. Otherwise the first existing file among
/// `<exe dir>/geolabel.json` and `<user config dir>/geolabel.json`; if
/// neither exists, the one next to the executable.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let beside_exe = exe_directory().join(CONFIG_FILE_NAME);
    if beside_exe.exists() {
        return beside_exe;
    }
    if let Some(user) = user_config_directory().map(|d| d.join(CONFIG_FILE_NAME)) {
        if user.exists() {
            return user;
        }
    }
    beside_exe
}
