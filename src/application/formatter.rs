//! Terminal output for extraction results and resolved paths.

use std::path::Path;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::ExtractionStats;
use crate::infrastructure::{PathKind, PathResolver};

use super::extractor::{BrowserScan, ExtractionReport};

/// Formats extraction statistics for display.
pub fn format_stats(stats: &ExtractionStats) -> String {
    format!(
        "{}\n  Existing loaded: {}\n  Sources scanned: {}\n  Sources missing: {}\n  Sources failed: {}\n  Parsed: {}\n  Added: {}\n  Duplicates skipped: {}\n  Total written: {}",
        "📊 Statistics".bold(),
        stats.existing_loaded.to_string().cyan(),
        stats.sources_scanned.to_string().green(),
        stats.sources_missing.to_string().yellow(),
        stats.sources_failed.to_string().red(),
        stats.records_parsed.to_string().cyan(),
        stats.records_added.to_string().green(),
        stats.duplicates_skipped.to_string().yellow(),
        stats.total_written.to_string().bold()
    )
}

/// Formats the outcome of a completed run.
pub fn format_report(report: &ExtractionReport) -> String {
    let mut out = format!(
        "{} Wrote {} bookmarks to {}\n",
        "✓".green().bold(),
        report.stats.total_written,
        report.output_path.display()
    );
    if let Some(backup) = &report.backup_path {
        out.push_str(&format!("  Previous version kept at {}\n", backup.display()));
    }
    out.push('\n');
    out.push_str(&format_stats(&report.stats));
    out
}

/// Table of the resolved dashboard directories.
pub fn format_paths_table(resolver: &PathResolver) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Kind", "Path", "Exists"]);

    for kind in PathKind::ALL {
        let path = resolver.get_path(kind);
        table.add_row(vec![
            kind.label().to_string(),
            path.display().to_string(),
            exists_mark(path),
        ]);
    }

    table.to_string()
}

/// Table of the browser locations a run would scan.
pub fn format_locations_table(scans: &[BrowserScan]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Browser", "Bookmarks", "Found", "Favicons", "Found"]);

    for scan in scans {
        let row = match &scan.location {
            Some(location) => vec![
                scan.browser.to_string(),
                location.bookmarks.display().to_string(),
                exists_mark(&location.bookmarks),
                location
                    .favicons
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
                location
                    .favicons
                    .as_deref()
                    .map_or_else(|| "-".to_string(), exists_mark),
            ],
            None => vec![
                scan.browser.to_string(),
                "(unsupported platform)".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
        };
        table.add_row(row);
    }

    table.to_string()
}

fn exists_mark(path: &Path) -> String {
    let mark = if path.exists() { "yes" } else { "no" };
    mark.to_string()
}
