//! Domain layer - core types for bookmark extraction.
//!
//! This layer contains pure domain models, configuration types and
//! error types without any I/O.

pub mod config;
pub mod error;
pub mod models;
pub mod outcome;

pub use config::{AppConfig, DashboardConfig, PathsConfig};
pub use error::{AppError, Result};
pub use models::{
    is_web_url, BookmarkRecord, BrowserId, BrowserKind, ExtractionStats, SavedBookmark,
};
pub use outcome::Outcome;
