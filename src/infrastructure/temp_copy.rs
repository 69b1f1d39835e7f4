//! Private copies of live browser databases.
//!
//! Browsers keep their `SQLite` files locked while running, so readers work
//! on a copy inside a temporary directory that is removed on drop.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tempfile::TempDir;

use crate::domain::{AppError, Result};

/// Journal sidecars that hold not-yet-checkpointed writes.
const SIDECAR_SUFFIXES: &[&str] = &["-wal"];

/// A database file copied into a temporary directory.
#[derive(Debug)]
pub struct TempDbCopy {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDbCopy {
    /// Copies `source` (and its WAL sidecar, if any) into a fresh temporary directory.
    ///
    /// # Errors
    /// Returns error if the source does not exist or cannot be copied.
    pub fn create(source: &Path) -> Result<Self> {
        if !source.is_file() {
            return Err(AppError::ProfileNotFound {
                path: source.to_path_buf(),
            });
        }

        let dir = tempfile::tempdir()
            .map_err(|e| AppError::io("Failed to create temp directory", e))?;

        let file_name = source
            .file_name()
            .map_or_else(|| "copy.sqlite".into(), ToOwned::to_owned);
        let path = dir.path().join(&file_name);

        fs::copy(source, &path).map_err(|e| {
            AppError::io(format!("Failed to copy database {}", source.display()), e)
        })?;

        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar_name = file_name.clone();
            sidecar_name.push(suffix);
            let sidecar = source.with_file_name(&sidecar_name);
            if sidecar.is_file() {
                if let Err(e) = fs::copy(&sidecar, dir.path().join(&sidecar_name)) {
                    tracing::debug!("Skipping sidecar {}: {}", sidecar.display(), e);
                }
            }
        }

        tracing::debug!(source = %source.display(), copy = %path.display(), "Copied database");

        Ok(Self { _dir: dir, path })
    }

    /// Location of the copy inside the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the copy for querying.
    ///
    /// The copy is opened read-write so `SQLite` can replay a WAL sidecar,
    /// then locked down with `query_only`.
    ///
    /// # Errors
    /// Returns error if database cannot be opened.
    pub fn open(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(self.path(), flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        Ok(conn)
    }
}
