//! File System Utilities
//!
//! Configuration and cache directory management.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "xcmd", "xcmd-gui").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/xcmd-gui/` or `$XDG_CONFIG_HOME/xcmd-gui/`
/// - **macOS**: `~/Library/Application Support/dev.xcmd.xcmd-gui/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\xcmd\xcmd-gui\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let config_dir = project_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    Ok(config_dir.to_path_buf())
}

/// Get the log directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.cache/xcmd-gui/logs/`
/// - **macOS**: `~/Library/Caches/dev.xcmd.xcmd-gui/logs/`
/// - **Windows**: `C:\Users\<User>\AppData\Local\xcmd\xcmd-gui\cache\logs\`
pub fn get_or_create_log_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let log_dir = project_dirs.cache_dir().join("logs");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}
