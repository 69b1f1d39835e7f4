//! Dashboard path resolution.
//!
//! Locates the project root and resolves the configured data, asset, log,
//! icon and backup directories against it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, PathsConfig, Result};

/// Environment variable pointing at the dashboard root.
pub const ROOT_ENV_VAR: &str = "NEXO_DASHBOARD_PATH";

/// Files whose presence marks a directory as the dashboard root.
const ROOT_MARKERS: &[&str] = &["package.json", "ROADMAP.md"];

/// Kinds of directories the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Root,
    Data,
    Assets,
    Logs,
    Icons,
    Backup,
}

impl PathKind {
    pub const ALL: [Self; 6] = [
        Self::Root,
        Self::Data,
        Self::Assets,
        Self::Logs,
        Self::Icons,
        Self::Backup,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Data => "data",
            Self::Assets => "assets",
            Self::Logs => "logs",
            Self::Icons => "icons",
            Self::Backup => "backup",
        }
    }
}

/// Absolute dashboard directories for one run.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    data: PathBuf,
    assets: PathBuf,
    logs: PathBuf,
    icons: PathBuf,
    backup: PathBuf,
}

impl PathResolver {
    /// Resolves every configured directory against `root`.
    #[must_use]
    pub fn new(root: PathBuf, paths: &PathsConfig) -> Self {
        Self {
            data: resolve(&root, &paths.data_dir),
            assets: resolve(&root, &paths.assets_dir),
            logs: resolve(&root, &paths.logs_dir),
            icons: resolve(&root, &paths.icons_dir),
            backup: resolve(&root, &paths.backup_dir),
            root,
        }
    }

    #[must_use]
    pub fn get_path(&self, kind: PathKind) -> &Path {
        match kind {
            PathKind::Root => &self.root,
            PathKind::Data => &self.data,
            PathKind::Assets => &self.assets,
            PathKind::Logs => &self.logs,
            PathKind::Icons => &self.icons,
            PathKind::Backup => &self.backup,
        }
    }

    /// Full path of a file inside the data directory.
    #[must_use]
    pub fn get_data_file(&self, file_name: &str) -> PathBuf {
        self.data.join(file_name)
    }

    /// Creates all resolved directories.
    ///
    /// # Errors
    /// Returns error if a directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        for kind in PathKind::ALL {
            let path = self.get_path(kind);
            fs::create_dir_all(path).map_err(|e| {
                AppError::io(format!("Failed to create {} directory", kind.label()), e)
            })?;
        }
        Ok(())
    }
}

/// Finds the dashboard root.
///
/// Order: `NEXO_DASHBOARD_PATH`, then the nearest ancestor of `start`
/// containing a root marker, then `start` itself.
#[must_use]
pub fn find_project_root(env_override: Option<PathBuf>, start: &Path) -> PathBuf {
    if let Some(root) = env_override.filter(|p| !p.as_os_str().is_empty()) {
        tracing::debug!(root = %root.display(), "Project root from {}", ROOT_ENV_VAR);
        return absolutize(&root, start);
    }

    for dir in start.ancestors() {
        if ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file()) {
            tracing::debug!(root = %dir.display(), "Project root from marker file");
            return dir.to_path_buf();
        }
    }

    start.to_path_buf()
}

/// Resolves the project root from the process environment and working directory.
///
/// # Errors
/// Returns error if the current directory cannot be determined.
pub fn discover_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| AppError::io("Failed to determine current directory", e))?;
    let env_root = std::env::var_os(ROOT_ENV_VAR).map(PathBuf::from);
    Ok(find_project_root(env_root, &cwd))
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    normalize(&joined)
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize(&base.join(path))
    }
}

/// Drops `.` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
