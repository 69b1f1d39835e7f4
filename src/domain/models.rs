//! Domain models for extracted bookmarks.
//!
//! These models represent the unified bookmark records written to the
//! dashboard's `links_web.json`, independent of which browser they came from.

use serde::{Deserialize, Deserializer, Serialize};

/// Browsers the extractor knows how to read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BrowserId {
    /// Google Chrome.
    Chrome,
    /// Chromium (open-source build).
    Chromium,
    /// Microsoft Edge.
    Edge,
    /// Brave.
    Brave,
    /// Mozilla Firefox.
    Firefox,
}

impl BrowserId {
    /// Every known browser, in default scan order.
    pub const ALL: [Self; 5] = [
        Self::Chrome,
        Self::Chromium,
        Self::Edge,
        Self::Brave,
        Self::Firefox,
    ];

    /// Storage format family of this browser.
    #[must_use]
    pub const fn kind(self) -> BrowserKind {
        match self {
            Self::Chrome | Self::Chromium | Self::Edge | Self::Brave => BrowserKind::Chromium,
            Self::Firefox => BrowserKind::Firefox,
        }
    }

    /// Lowercase identifier as written in the `browser` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Chromium => "chromium",
            Self::Edge => "edge",
            Self::Brave => "brave",
            Self::Firefox => "firefox",
        }
    }
}

impl std::fmt::Display for BrowserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a browser stores its bookmarks on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    /// JSON `Bookmarks` file plus a `Favicons` `SQLite` database.
    Chromium,
    /// `places.sqlite` inside a profile directory.
    Firefox,
}

/// A single extracted bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    /// Display title, possibly empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Absolute http(s) URL; the dedup key.
    pub url: String,
    /// Root-relative folder path joined with `/`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Non-empty segments of `category`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Embedded icon as a data URI.
    #[serde(default)]
    pub favicon: Option<String>,
    /// Source browser.
    pub browser: BrowserId,
    #[serde(default)]
    pub date_added: Option<String>,
    /// Only available from Firefox.
    #[serde(default)]
    pub last_visited: Option<String>,
    /// Fields written by other tools, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BookmarkRecord {
    /// Creates a record, deriving `tags` from `category`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
        browser: BrowserId,
    ) -> Self {
        let category = category.into();
        Self {
            name: name.into(),
            url: url.into(),
            tags: tags_from_category(&category),
            category,
            favicon: None,
            browser,
            date_added: None,
            last_visited: None,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_favicon(mut self, favicon: Option<String>) -> Self {
        self.favicon = favicon;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, date_added: Option<String>, last_visited: Option<String>) -> Self {
        self.date_added = date_added;
        self.last_visited = last_visited;
        self
    }
}

/// Splits a `/`-joined folder path into its non-empty segments.
#[must_use]
pub fn tags_from_category(category: &str) -> Vec<String> {
    category
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a URL uses the http or https scheme.
#[must_use]
pub fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the output file as loaded from disk.
///
/// Entries written by other tools may not fit [`BookmarkRecord`] (an unknown
/// browser, a missing field). As long as they carry a URL they are kept and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SavedBookmark {
    Record(BookmarkRecord),
    Foreign(serde_json::Value),
}

impl SavedBookmark {
    /// Classifies a raw JSON entry, or `None` if it has no string `url`.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if !value.get("url").is_some_and(serde_json::Value::is_string) {
            return None;
        }
        Some(match BookmarkRecord::deserialize(&value) {
            Ok(record) => Self::Record(record),
            Err(_) => Self::Foreign(value),
        })
    }

    /// The dedup key.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Record(record) => &record.url,
            Self::Foreign(value) => value
                .get("url")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default(),
        }
    }
}

impl From<BookmarkRecord> for SavedBookmark {
    fn from(record: BookmarkRecord) -> Self {
        Self::Record(record)
    }
}

/// Counters for a single extraction run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionStats {
    /// Records loaded from the existing output file.
    pub existing_loaded: usize,
    /// Browser sources that were read successfully.
    pub sources_scanned: usize,
    /// Browser sources whose files were not found.
    pub sources_missing: usize,
    /// Browser sources that could not be read.
    pub sources_failed: usize,
    /// Records produced by the parsers.
    pub records_parsed: usize,
    /// New records appended to the collection.
    pub records_added: usize,
    /// Parsed records dropped because their URL was already present.
    pub duplicates_skipped: usize,
    /// Records in the written file.
    pub total_written: usize,
}
