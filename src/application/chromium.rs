//! Chromium-family bookmark parsing.
//!
//! Reads the JSON `Bookmarks` file shared by Chrome, Chromium, Edge and Brave
//! and flattens its folder tree into records.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{is_web_url, BookmarkRecord, BrowserId, Outcome};

use super::favicon::FaviconFetcher;
use super::timestamps::chromium_time_to_iso;

#[derive(Debug, Deserialize)]
struct RawBookmarksFile {
    roots: serde_json::Map<String, serde_json::Value>,
}

/// One node of the bookmark tree as stored on disk.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    node_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    date_added: Option<serde_json::Value>,
    #[serde(default)]
    children: Vec<RawNode>,
}

/// Parses a Chromium `Bookmarks` file.
///
/// Favicons are embedded when `favicon_db` is given and readable.
pub fn parse_chromium_bookmarks(
    path: &Path,
    browser: BrowserId,
    favicon_db: Option<&Path>,
) -> Outcome<Vec<BookmarkRecord>> {
    if !path.is_file() {
        tracing::warn!("[{}] Bookmarks file not found at: {}", browser, path.display());
        return Outcome::NotFound(path.to_path_buf());
    }

    tracing::info!("[{}] Parsing bookmarks...", browser);

    let file = match read_bookmarks_file(path) {
        Ok(file) => file,
        Err(message) => {
            tracing::warn!("[{}] {}", browser, message);
            return Outcome::Malformed(message);
        }
    };

    let favicons = FaviconFetcher::open(favicon_db, browser);
    let mut walker = TreeWalker {
        browser,
        favicons: &favicons,
        records: Vec::new(),
        skipped: 0,
    };

    for (root_name, value) in &file.roots {
        match RawNode::deserialize(value) {
            Ok(root) => walker.visit(&root, ""),
            Err(_) => tracing::debug!("[{}] Skipping non-node root entry '{}'", browser, root_name),
        }
    }

    if walker.skipped > 0 {
        tracing::debug!("[{}] Skipped {} non-web bookmarks", browser, walker.skipped);
    }
    tracing::info!("[{}] Found {} bookmarks.", browser, walker.records.len());

    Outcome::Found(walker.records)
}

fn read_bookmarks_file(path: &Path) -> Result<RawBookmarksFile, String> {
    let content = fs::read(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_slice(&content)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

struct TreeWalker<'a> {
    browser: BrowserId,
    favicons: &'a FaviconFetcher,
    records: Vec<BookmarkRecord>,
    skipped: usize,
}

impl TreeWalker<'_> {
    fn visit(&mut self, node: &RawNode, folder_path: &str) {
        match node.node_type.as_str() {
            "url" => self.visit_url(node, folder_path),
            "folder" => {
                let name = node.name.as_deref().unwrap_or_default();
                let path = if folder_path.is_empty() {
                    name.to_string()
                } else {
                    format!("{folder_path}/{name}")
                };
                for child in &node.children {
                    self.visit(child, &path);
                }
            }
            _ => {}
        }
    }

    fn visit_url(&mut self, node: &RawNode, folder_path: &str) {
        let Some(url) = node.url.as_deref().filter(|u| is_web_url(u)) else {
            self.skipped += 1;
            return;
        };

        let date_added = match &node.date_added {
            Some(serde_json::Value::String(s)) => chromium_time_to_iso(Some(s.as_str())),
            Some(serde_json::Value::Number(n)) => chromium_time_to_iso(Some(n.to_string().as_str())),
            _ => None,
        };

        let record = BookmarkRecord::new(
            node.name.clone().unwrap_or_default(),
            url,
            folder_path,
            self.browser,
        )
        .with_dates(date_added, None)
        .with_favicon(self.favicons.fetch(url));

        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::favicon_db::fixtures::create_favicons_db;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "checksum": "abc",
        "roots": {
            "bookmark_bar": {
                "type": "folder", "name": "Bookmarks bar", "children": [
                    {"type": "url", "name": "Rust", "url": "https://www.rust-lang.org/",
                     "date_added": "13345678901234567"},
                    {"type": "folder", "name": "Work", "children": [
                        {"type": "folder", "name": "Dev", "children": [
                            {"type": "url", "name": "Docs", "url": "https://docs.rs/", "date_added": "0"}
                        ]}
                    ]}
                ]
            },
            "other": {
                "type": "folder", "name": "Other bookmarks", "children": [
                    {"type": "url", "name": "Settings", "url": "chrome://settings"},
                    {"type": "url", "name": "Plain", "url": "http://plain.example/"}
                ]
            },
            "sync_transaction_version": "1"
        },
        "version": 1
    }"#;

    fn write_sample(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("Bookmarks");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_walks_folders_in_order() {
        let dir = tempdir().unwrap();
        let path = write_sample(dir.path(), SAMPLE);

        let Outcome::Found(records) = parse_chromium_bookmarks(&path, BrowserId::Chrome, None) else {
            panic!("expected records");
        };

        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://www.rust-lang.org/", "https://docs.rs/", "http://plain.example/"]
        );

        assert_eq!(records[0].category, "Bookmarks bar");
        assert_eq!(records[0].date_added.as_deref(), Some("2023-11-28T21:01:41.234567Z"));
        assert_eq!(records[1].category, "Bookmarks bar/Work/Dev");
        assert_eq!(records[1].tags, vec!["Bookmarks bar", "Work", "Dev"]);
        assert_eq!(records[1].date_added, None);
        assert!(records.iter().all(|r| r.last_visited.is_none()));
        assert!(records.iter().all(|r| r.browser == BrowserId::Chrome));
        assert!(records.iter().all(|r| r.favicon.is_none()));
    }

    #[test]
    fn test_internal_scheme_only_yields_nothing() {
        let dir = tempdir().unwrap();
        let path = write_sample(
            dir.path(),
            r#"{"roots": {"bookmark_bar": {"type": "folder", "name": "", "children": [
                {"type": "folder", "name": "Dev", "children": [
                    {"type": "url", "name": "Flags", "url": "chrome://flags"}
                ]}
            ]}}}"#,
        );

        assert_eq!(
            parse_chromium_bookmarks(&path, BrowserId::Edge, None),
            Outcome::Found(Vec::new())
        );
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("Bookmarks");
        assert!(matches!(
            parse_chromium_bookmarks(&missing, BrowserId::Brave, None),
            Outcome::NotFound(_)
        ));

        let path = write_sample(dir.path(), "{\"roots\": [");
        assert!(matches!(
            parse_chromium_bookmarks(&path, BrowserId::Brave, None),
            Outcome::Malformed(_)
        ));
    }

    #[test]
    fn test_favicons_embedded_from_db() {
        let dir = tempdir().unwrap();
        let path = write_sample(dir.path(), SAMPLE);
        let favicons = dir.path().join("Favicons");
        create_favicons_db(
            &favicons,
            &[("https://docs.rs/favicon.ico", 32, b"\x89PNG\r\n\x1a\n")],
        );

        let records = parse_chromium_bookmarks(&path, BrowserId::Chromium, Some(&favicons))
            .into_found_or_default();

        let docs = records.iter().find(|r| r.url == "https://docs.rs/").unwrap();
        assert_eq!(
            docs.favicon.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
        let rust = records.iter().find(|r| r.url == "https://www.rust-lang.org/").unwrap();
        assert!(rust.favicon.is_none());
    }

    #[test]
    fn test_missing_favicon_db_is_not_fatal() {
        let dir = tempdir().unwrap();
        let path = write_sample(dir.path(), SAMPLE);

        let records = parse_chromium_bookmarks(
            &path,
            BrowserId::Chrome,
            Some(&dir.path().join("Favicons")),
        )
        .into_found_or_default();

        assert_eq!(records.len(), 3);
    }
}
