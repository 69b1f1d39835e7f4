//! Nexo Bookmarks - Extract browser bookmarks into the dashboard's links file.
//!
//! Reads Chromium-family `Bookmarks` JSON files and Firefox `places.sqlite`
//! databases, normalizes them into one record format and writes a
//! deduplicated `links_web.json` for the dashboard.
//!
//!   nexo-bookmarks                               # scan every enabled browser
//!   nexo-bookmarks --browser firefox             # scan one browser
//!   nexo-bookmarks --merge-existing              # keep what is already saved
//!   nexo-bookmarks --include-favicons            # embed icons as data URIs
//!   nexo-bookmarks paths                         # show where files are looked up

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_locations_table, format_paths_table, format_report, run_extraction, ExtractOptions,
    ExtractionContext,
};
use cli::{Cli, Commands};
use domain::AppConfig;
use infrastructure::{
    config_file_path, discover_project_root, ensure_config_exists, load_config, PathResolver,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let root = discover_project_root()?;

    if let Some(Commands::InitConfig) = cli.command {
        return cmd_init_config(&root);
    }

    let config = load_config(cli.config.as_deref(), &root);
    let resolver = PathResolver::new(root, &config.paths);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| resolver.get_data_file(&config.output.file_name));

    match cli.command {
        Some(Commands::Paths) => cmd_paths(&config, &resolver, output, &cli.extract_options()),
        Some(Commands::InitConfig) => Ok(()),
        None => cmd_extract(&config, &resolver, output, &cli.extract_options()),
    }
}

/// Extract bookmarks command.
fn cmd_extract(
    config: &AppConfig,
    resolver: &PathResolver,
    output: PathBuf,
    options: &ExtractOptions,
) -> domain::Result<()> {
    resolver.ensure_directories()?;

    let context = ExtractionContext::from_config(config, output, options);
    let report = run_extraction(options, &context)?;

    println!("{}", format_report(&report));

    Ok(())
}

/// Show resolved paths command.
fn cmd_paths(
    config: &AppConfig,
    resolver: &PathResolver,
    output: PathBuf,
    options: &ExtractOptions,
) -> domain::Result<()> {
    let context = ExtractionContext::from_config(config, output, options);

    println!("{}", "📂 Dashboard Paths".bold());
    println!("{}", format_paths_table(resolver));
    println!();
    println!("Output file: {}", context.output_path.display());
    println!();
    println!("{}", "🌐 Browser Locations".bold());
    println!("{}", format_locations_table(&context.scans));

    Ok(())
}

/// Write default config command.
fn cmd_init_config(root: &std::path::Path) -> domain::Result<()> {
    let path = config_file_path(root);
    if ensure_config_exists(root)? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
