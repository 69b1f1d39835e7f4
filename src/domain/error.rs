//! Domain-level error types for nexo-bookmarks.
//!
//! All errors are typed with `thiserror` and carry enough context to be
//! printed directly to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Browser profile, bookmark file or database not found.
    #[error("Browser profile not found at: {path}")]
    ProfileNotFound { path: PathBuf },

    /// A places or favicon database could not be opened or queried.
    #[error("SQLite error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Bookmark records could not be serialized.
    #[error("JSON error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A config file could not be read or parsed.
    #[error("Config error: {message}")]
    Config { message: String },

    /// Filesystem access failed; `message` names the file involved.
    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Wraps a rusqlite failure.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Wraps a `serde_json` failure.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Wraps an I/O failure; the OS reason is appended to `context`.
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {err}", context.into()),
            source: Some(err),
        }
    }
}

/// Shorthand for results carrying an [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
