//! Configuration file management.
//!
//! Handles loading the TOML configuration, layering the dashboard's
//! `config.json` directories on top, and writing a default config.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, DashboardConfig, Result};

/// File name of the configuration inside the project root.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The dashboard's own settings file, shared with the desktop app.
pub const DASHBOARD_CONFIG_FILE_NAME: &str = "config.json";

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Nexo bookmark extractor configuration
# Auto-generated - edit as needed

[paths]
# Relative paths resolve against the dashboard root.
# dataPath/assetsPath/logsPath/iconsPath/backupPath in config.json win.
data_dir = "./data"
assets_dir = "./assets"
logs_dir = "./0_Electron_Docs_Reference/Dev_Logs"
icons_dir = "./assets/icons"
backup_dir = "./data/backups"

[output]
# Written inside data_dir
file_name = "links_web.json"

[browsers]
# Scanned in this order when --browser is not given
enabled = ["chrome", "chromium", "edge", "brave", "firefox"]

# Per-browser overrides, e.g. for a non-default profile:
# [browsers.paths.chrome]
# bookmarks = "/home/me/.config/google-chrome/Profile 1/Bookmarks"
# favicons = "/home/me/.config/google-chrome/Profile 1/Favicons"
"#;

/// Load configuration from `explicit`, or from `config.toml` in the project root.
///
/// Directory keys in the root's `config.json` override the TOML paths. A
/// missing, unreadable or unparseable file is logged and its defaults used.
#[must_use]
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> AppConfig {
    let config_path = explicit.map_or_else(|| config_file_path(project_root), Path::to_path_buf);

    let mut config = if config_path.exists() {
        load_config_from_file(&config_path).unwrap_or_else(|e| {
            tracing::warn!("{}, using defaults", e);
            AppConfig::default()
        })
    } else {
        if explicit.is_some() {
            tracing::warn!("Config file not found: {}, using defaults", config_path.display());
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        }
        AppConfig::default()
    };

    if let Some(dashboard) = load_dashboard_config(project_root) {
        dashboard.apply_to(&mut config.paths);
    }

    config
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file {}: {e}", path.display()),
    })
}

/// Reads the directory keys of `<root>/config.json`, if present and valid.
fn load_dashboard_config(project_root: &Path) -> Option<DashboardConfig> {
    let path = project_root.join(DASHBOARD_CONFIG_FILE_NAME);
    if !path.is_file() {
        return None;
    }

    let parsed: std::result::Result<DashboardConfig, String> = fs::read(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_slice(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(dashboard) => {
            tracing::debug!(path = %path.display(), "Using dashboard directories");
            Some(dashboard)
        }
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
            None
        }
    }
}

/// Create the default configuration file if it doesn't exist.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(project_root: &Path) -> Result<bool> {
    let config_path = config_file_path(project_root);

    if config_path.exists() {
        return Ok(false);
    }

    fs::create_dir_all(project_root)
        .map_err(|e| AppError::io("Failed to create project directory", e))?;

    fs::write(&config_path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %config_path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}
