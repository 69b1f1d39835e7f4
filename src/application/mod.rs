//! Application layer - use cases and orchestration.
//!
//! This layer contains the bookmark parsers, the merge/dedup driver and
//! output formatting.

pub mod chromium;
pub mod extractor;
pub mod favicon;
pub mod firefox;
pub mod formatter;
pub mod timestamps;

pub use extractor::{run_extraction, ExtractOptions, ExtractionContext};
pub use formatter::{format_locations_table, format_paths_table, format_report};
