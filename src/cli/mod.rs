//! CLI interface using clap.
//!
//! Without a subcommand the tool runs an extraction.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::ExtractOptions;
use crate::domain::BrowserId;

/// Nexo Bookmarks - Extract browser bookmarks into the dashboard's links file.
#[derive(Parser, Debug)]
#[command(name = "nexo-bookmarks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to config.toml in the dashboard root).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Extract from a single browser only.
    #[arg(long, value_enum)]
    pub browser: Option<BrowserId>,

    /// Include Base64-encoded favicons in the output.
    #[arg(long)]
    pub include_favicons: bool,

    /// Merge new bookmarks into the existing output file.
    #[arg(long)]
    pub merge_existing: bool,

    /// Output file (defaults to links_web.json in the data directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show resolved dashboard paths and browser locations.
    Paths,

    /// Write a default config.toml to the dashboard root.
    InitConfig,
}

impl Cli {
    /// Extraction options from the top-level flags.
    #[must_use]
    pub const fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            browser: self.browser,
            include_favicons: self.include_favicons,
            merge_existing: self.merge_existing,
        }
    }
}
