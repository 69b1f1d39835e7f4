//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod browser_paths;
pub mod config;
pub mod favicon_db;
pub mod output_store;
pub mod path_resolver;
pub mod places_reader;
pub mod temp_copy;

pub use browser_paths::{find_places_database, resolve_location, BrowserLocation};
pub use config::{config_file_path, ensure_config_exists, load_config};
pub use favicon_db::FaviconDb;
pub use output_store::{backup_existing, load_existing, write_records};
pub use path_resolver::{discover_project_root, PathKind, PathResolver};
pub use places_reader::{PlacesReader, PlacesRow};
