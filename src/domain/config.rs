//! Configuration models.
//!
//! Mirrors the TOML config file (dashboard directories, output file name,
//! per-browser overrides) and the directory keys of the dashboard's shared
//! `config.json`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::models::BrowserId;

/// Dashboard directories, relative to the project root unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            assets_dir: default_assets_dir(),
            logs_dir: default_logs_dir(),
            icons_dir: default_icons_dir(),
            backup_dir: default_backup_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./assets")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("./0_Electron_Docs_Reference/Dev_Logs")
}

fn default_icons_dir() -> PathBuf {
    PathBuf::from("./assets/icons")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("./data/backups")
}

/// Directory keys of the dashboard's `config.json`.
///
/// The file is shared with the dashboard app; keys this tool does not use
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub data_path: Option<PathBuf>,
    pub assets_path: Option<PathBuf>,
    pub logs_path: Option<PathBuf>,
    pub icons_path: Option<PathBuf>,
    pub backup_path: Option<PathBuf>,
}

impl DashboardConfig {
    /// Overrides every directory that is set here.
    pub fn apply_to(self, paths: &mut PathsConfig) {
        let overrides = [
            (self.data_path, &mut paths.data_dir),
            (self.assets_path, &mut paths.assets_dir),
            (self.logs_path, &mut paths.logs_dir),
            (self.icons_path, &mut paths.icons_dir),
            (self.backup_path, &mut paths.backup_dir),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name inside the data directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "links_web.json".to_string()
}

/// Overrides for one browser's file locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserPathOverride {
    /// `Bookmarks` file (Chromium) or profiles directory (Firefox).
    #[serde(default)]
    pub bookmarks: Option<PathBuf>,

    /// `Favicons` database (Chromium only).
    #[serde(default)]
    pub favicons: Option<PathBuf>,
}

/// Which browsers to scan and where to find them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowsersConfig {
    /// Browsers scanned when no `--browser` is given, in order.
    #[serde(default = "default_enabled")]
    pub enabled: Vec<BrowserId>,

    #[serde(default)]
    pub paths: BTreeMap<BrowserId, BrowserPathOverride>,
}

impl Default for BrowsersConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            paths: BTreeMap::new(),
        }
    }
}

fn default_enabled() -> Vec<BrowserId> {
    BrowserId::ALL.to_vec()
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub browsers: BrowsersConfig,
}
