//! Bookmark extraction service.
//!
//! Orchestrates the per-browser parsers, merges their output with any
//! previous extraction and writes the unified file.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::{
    AppConfig, BookmarkRecord, BrowserId, BrowserKind, ExtractionStats, Outcome, Result,
    SavedBookmark,
};
use crate::infrastructure::{backup_existing, load_existing, resolve_location, write_records, BrowserLocation};

use super::chromium::parse_chromium_bookmarks;
use super::firefox::parse_firefox_bookmarks;

/// Options for bookmark extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Only scan this browser instead of every enabled one.
    pub browser: Option<BrowserId>,
    /// Embed favicons as data URIs.
    pub include_favicons: bool,
    /// Keep records from the existing output file and append to them.
    pub merge_existing: bool,
}

/// One browser to scan and where its data lives, if known.
#[derive(Debug, Clone)]
pub struct BrowserScan {
    pub browser: BrowserId,
    pub location: Option<BrowserLocation>,
}

/// Everything a run needs to know about the machine it runs on.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub output_path: PathBuf,
    pub scans: Vec<BrowserScan>,
}

impl ExtractionContext {
    /// Builds the scan list from config, narrowed to `options.browser` when set.
    #[must_use]
    pub fn from_config(config: &AppConfig, output_path: PathBuf, options: &ExtractOptions) -> Self {
        let browsers = options
            .browser
            .map_or_else(|| config.browsers.enabled.clone(), |b| vec![b]);

        let scans = browsers
            .into_iter()
            .map(|browser| BrowserScan {
                browser,
                location: resolve_location(config, browser),
            })
            .collect();

        Self { output_path, scans }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct ExtractionReport {
    pub output_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub stats: ExtractionStats,
}

/// Runs a full extraction and writes the output file.
///
/// Missing or unreadable browser data is logged and skipped.
///
/// # Errors
/// Returns error only if the backup or the final write fails.
pub fn run_extraction(options: &ExtractOptions, context: &ExtractionContext) -> Result<ExtractionReport> {
    let mut stats = ExtractionStats::default();

    let mut records = if options.merge_existing {
        load_seed(&context.output_path)
    } else {
        Vec::new()
    };
    stats.existing_loaded = records.len();
    let mut seen = seed_urls(&records);

    for scan in &context.scans {
        let outcome = scan_browser(scan, options.include_favicons);
        match outcome {
            Outcome::Found(parsed) => {
                stats.sources_scanned += 1;
                stats.records_parsed += parsed.len();
                merge_records(&mut records, &mut seen, parsed, &mut stats);
            }
            Outcome::NotFound(_) => stats.sources_missing += 1,
            Outcome::Malformed(_) => stats.sources_failed += 1,
        }
    }

    let backup_path = backup_existing(&context.output_path)?;

    tracing::info!(
        "Writing a total of {} bookmarks to {}...",
        records.len(),
        context.output_path.display()
    );
    write_records(&context.output_path, &records)?;
    stats.total_written = records.len();

    Ok(ExtractionReport {
        output_path: context.output_path.clone(),
        backup_path,
        stats,
    })
}

/// Appends records whose URL hasn't been seen yet; first seen wins.
pub fn merge_records(
    records: &mut Vec<SavedBookmark>,
    seen: &mut HashSet<String>,
    incoming: Vec<BookmarkRecord>,
    stats: &mut ExtractionStats,
) {
    for record in incoming {
        if seen.insert(record.url.clone()) {
            records.push(record.into());
            stats.records_added += 1;
        } else {
            stats.duplicates_skipped += 1;
        }
    }
}

fn seed_urls(records: &[SavedBookmark]) -> HashSet<String> {
    records.iter().map(|r| r.url().to_string()).collect()
}

fn load_seed(path: &std::path::Path) -> Vec<SavedBookmark> {
    let outcome = load_existing(path);
    match &outcome {
        Outcome::Found(records) => tracing::info!(
            "Loaded {} existing bookmarks from {} for merging",
            records.len(),
            path.display()
        ),
        Outcome::NotFound(_) => {
            tracing::info!("No existing bookmarks at {}, starting fresh", path.display());
        }
        Outcome::Malformed(message) => {
            tracing::warn!("Existing bookmarks file is corrupted, starting fresh: {}", message);
        }
    }
    outcome.into_found_or_default()
}

fn scan_browser(scan: &BrowserScan, include_favicons: bool) -> Outcome<Vec<BookmarkRecord>> {
    let Some(location) = &scan.location else {
        tracing::warn!("[{}] No known bookmark location on this platform", scan.browser);
        return Outcome::NotFound(PathBuf::new());
    };

    match scan.browser.kind() {
        BrowserKind::Chromium => {
            let favicons = location.favicons.as_deref().filter(|_| include_favicons);
            parse_chromium_bookmarks(&location.bookmarks, scan.browser, favicons)
        }
        BrowserKind::Firefox => {
            parse_firefox_bookmarks(&location.bookmarks, scan.browser, include_favicons)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::output_store::backup_path;
    use crate::infrastructure::places_reader::fixtures::{PlacesFixture, MENU};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn record(entry: &SavedBookmark) -> &BookmarkRecord {
        match entry {
            SavedBookmark::Record(record) => record,
            SavedBookmark::Foreign(value) => panic!("unexpected raw entry {value}"),
        }
    }

    fn chrome_file(dir: &Path, urls: &[(&str, &str)]) -> PathBuf {
        let children: Vec<serde_json::Value> = urls
            .iter()
            .map(|(name, url)| serde_json::json!({"type": "url", "name": name, "url": url}))
            .collect();
        let doc = serde_json::json!({
            "roots": {"bookmark_bar": {"type": "folder", "name": "Bar", "children": children}}
        });
        let path = dir.join("Bookmarks");
        fs::write(&path, doc.to_string()).unwrap();
        path
    }

    fn chrome_scan(browser: BrowserId, bookmarks: PathBuf) -> BrowserScan {
        BrowserScan {
            browser,
            location: Some(BrowserLocation {
                browser,
                bookmarks,
                favicons: None,
            }),
        }
    }

    #[test]
    fn test_merge_records_first_seen_wins() {
        let mut records = vec![SavedBookmark::from(BookmarkRecord::new(
            "Old",
            "https://a.example/",
            "",
            BrowserId::Chrome,
        ))];
        let mut seen = seed_urls(&records);
        let mut stats = ExtractionStats::default();

        merge_records(
            &mut records,
            &mut seen,
            vec![
                BookmarkRecord::new("New", "https://a.example/", "X", BrowserId::Firefox),
                BookmarkRecord::new("B", "https://b.example/", "", BrowserId::Firefox),
                BookmarkRecord::new("B again", "https://b.example/", "", BrowserId::Firefox),
            ],
            &mut stats,
        );

        assert_eq!(records.len(), 2);
        assert_eq!(record(&records[0]).name, "Old");
        assert_eq!(record(&records[1]).name, "B");
        assert_eq!(stats.records_added, 1);
        assert_eq!(stats.duplicates_skipped, 2);
    }

    #[test]
    fn test_run_dedups_across_browsers() {
        let dir = tempdir().unwrap();
        let chrome_dir = dir.path().join("chrome");
        let brave_dir = dir.path().join("brave");
        fs::create_dir_all(&chrome_dir).unwrap();
        fs::create_dir_all(&brave_dir).unwrap();

        let context = ExtractionContext {
            output_path: dir.path().join("data").join("links_web.json"),
            scans: vec![
                chrome_scan(BrowserId::Chrome, chrome_file(&chrome_dir, &[("A", "https://a.example/")])),
                chrome_scan(
                    BrowserId::Brave,
                    chrome_file(&brave_dir, &[("A dup", "https://a.example/"), ("C", "https://c.example/")]),
                ),
            ],
        };

        let report = run_extraction(&ExtractOptions::default(), &context).unwrap();

        let written = load_existing(&context.output_path).into_found_or_default();
        assert_eq!(written.len(), 2);
        assert_eq!(record(&written[0]).browser, BrowserId::Chrome);
        assert_eq!(written[1].url(), "https://c.example/");
        assert_eq!(report.stats.sources_scanned, 2);
        assert_eq!(report.stats.duplicates_skipped, 1);
        assert!(report.backup_path.is_none());
    }

    #[test]
    fn test_merge_existing_keeps_seed_and_backs_up() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("links_web.json");
        let seed = vec![BookmarkRecord::new("Seed", "https://a.example/", "Saved", BrowserId::Edge)];
        write_records(&output, &seed).unwrap();
        let before = fs::read(&output).unwrap();

        let context = ExtractionContext {
            output_path: output.clone(),
            scans: vec![chrome_scan(
                BrowserId::Chrome,
                chrome_file(dir.path(), &[("Fresh", "https://a.example/"), ("B", "https://b.example/")]),
            )],
        };
        let options = ExtractOptions {
            merge_existing: true,
            ..Default::default()
        };

        let report = run_extraction(&options, &context).unwrap();

        let written = load_existing(&output).into_found_or_default();
        assert_eq!(written.len(), 2);
        assert_eq!(record(&written[0]), &seed[0]);
        assert_eq!(report.stats.existing_loaded, 1);
        assert_eq!(report.backup_path, Some(backup_path(&output)));
        assert_eq!(fs::read(backup_path(&output)).unwrap(), before);
    }

    #[test]
    fn test_merge_with_nothing_new_is_unchanged() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("links_web.json");
        let seed = vec![
            BookmarkRecord::new("One", "https://one.example/", "A/B", BrowserId::Firefox)
                .with_dates(Some("2023-11-14T22:13:20.000000Z".into()), None),
            BookmarkRecord::new("Two", "https://two.example/", "", BrowserId::Chrome),
        ];
        write_records(&output, &seed).unwrap();
        let before = fs::read(&output).unwrap();

        let context = ExtractionContext {
            output_path: output.clone(),
            scans: vec![chrome_scan(BrowserId::Chrome, dir.path().join("missing").join("Bookmarks"))],
        };
        let options = ExtractOptions {
            merge_existing: true,
            ..Default::default()
        };

        let report = run_extraction(&options, &context).unwrap();

        assert_eq!(fs::read(&output).unwrap(), before);
        assert_eq!(report.stats.sources_missing, 1);
    }

    #[test]
    fn test_corrupt_existing_starts_fresh() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("links_web.json");
        fs::write(&output, "[{\"url\": ").unwrap();

        let context = ExtractionContext {
            output_path: output.clone(),
            scans: vec![chrome_scan(
                BrowserId::Chrome,
                chrome_file(dir.path(), &[("B", "https://b.example/")]),
            )],
        };
        let options = ExtractOptions {
            merge_existing: true,
            ..Default::default()
        };

        let report = run_extraction(&options, &context).unwrap();

        assert_eq!(report.stats.existing_loaded, 0);
        assert_eq!(load_existing(&output).into_found_or_default().len(), 1);
        assert_eq!(fs::read_to_string(backup_path(&output)).unwrap(), "[{\"url\": ");
    }

    #[test]
    fn test_without_merge_existing_is_replaced() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("links_web.json");
        write_records(
            &output,
            &[BookmarkRecord::new("Old", "https://old.example/", "", BrowserId::Chrome)],
        )
        .unwrap();

        let context = ExtractionContext {
            output_path: output.clone(),
            scans: vec![chrome_scan(
                BrowserId::Chrome,
                chrome_file(dir.path(), &[("New", "https://new.example/")]),
            )],
        };

        run_extraction(&ExtractOptions::default(), &context).unwrap();

        let written = load_existing(&output).into_found_or_default();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].url(), "https://new.example/");
    }

    #[test]
    fn test_merge_keeps_entries_from_other_tools() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("links_web.json");
        fs::write(
            &output,
            r#"[
  {"name": "Known", "url": "https://known.example/", "category": "", "tags": [], "browser": "chrome"},
  {"name": "Pinned", "url": "https://pinned.example/", "pinned": true},
  {"name": "Orphan"}
]"#,
        )
        .unwrap();

        let context = ExtractionContext {
            output_path: output.clone(),
            scans: vec![chrome_scan(
                BrowserId::Chrome,
                chrome_file(
                    dir.path(),
                    &[("Pinned again", "https://pinned.example/"), ("New", "https://new.example/")],
                ),
            )],
        };
        let options = ExtractOptions {
            merge_existing: true,
            ..Default::default()
        };

        let report = run_extraction(&options, &context).unwrap();

        assert_eq!(report.stats.existing_loaded, 2);
        assert_eq!(report.stats.records_added, 1);
        assert_eq!(report.stats.duplicates_skipped, 1);

        let written: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(
            written[1],
            serde_json::json!({"name": "Pinned", "url": "https://pinned.example/", "pinned": true})
        );
        assert_eq!(written[2]["url"], "https://new.example/");
    }

    #[test]
    fn test_firefox_and_unknown_location() {
        let dir = tempdir().unwrap();
        let profiles = dir.path().join("firefox");
        fs::create_dir_all(profiles.join("p.default")).unwrap();
        let fx = PlacesFixture::create(&profiles.join("p.default").join("places.sqlite"), false);
        fx.bookmark(MENU, "Fox", "https://fox.example/", 0, None);
        drop(fx);

        let context = ExtractionContext {
            output_path: dir.path().join("links_web.json"),
            scans: vec![
                BrowserScan {
                    browser: BrowserId::Firefox,
                    location: Some(BrowserLocation {
                        browser: BrowserId::Firefox,
                        bookmarks: profiles,
                        favicons: None,
                    }),
                },
                BrowserScan {
                    browser: BrowserId::Edge,
                    location: None,
                },
            ],
        };

        let report = run_extraction(&ExtractOptions::default(), &context).unwrap();

        assert_eq!(report.stats.sources_scanned, 1);
        assert_eq!(report.stats.sources_missing, 1);
        assert_eq!(report.stats.total_written, 1);
    }

    #[test]
    fn test_context_narrows_to_selected_browser() {
        let config = AppConfig::default();
        let options = ExtractOptions {
            browser: Some(BrowserId::Brave),
            ..Default::default()
        };

        let context = ExtractionContext::from_config(&config, PathBuf::from("out.json"), &options);
        assert_eq!(context.scans.len(), 1);
        assert_eq!(context.scans[0].browser, BrowserId::Brave);

        let all = ExtractionContext::from_config(&config, PathBuf::from("out.json"), &ExtractOptions::default());
        assert_eq!(all.scans.len(), BrowserId::ALL.len());
    }
}
