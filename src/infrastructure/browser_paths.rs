//! Browser profile path discovery.
//!
//! Handles locating each browser's bookmark store across platforms, and
//! finding `places.sqlite` inside a Firefox profiles tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, BrowserId, BrowserKind};

/// Firefox's bookmark and history store.
pub const PLACES_DB_NAME: &str = "places.sqlite";

/// Chromium-family bookmark file and favicon database names.
const CHROMIUM_BOOKMARKS_FILE: &str = "Bookmarks";
const CHROMIUM_FAVICONS_DB: &str = "Favicons";
const CHROMIUM_DEFAULT_PROFILE: &str = "Default";

/// Where one browser keeps its bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserLocation {
    pub browser: BrowserId,
    /// `Bookmarks` JSON file (Chromium) or profiles directory (Firefox).
    pub bookmarks: PathBuf,
    /// `Favicons` database; always `None` for Firefox.
    pub favicons: Option<PathBuf>,
}

/// User-data directory of a browser relative to the platform base directory.
#[cfg(target_os = "linux")]
fn user_data_dir(browser: BrowserId) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let config = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
    Some(match browser {
        BrowserId::Chrome => config.join("google-chrome"),
        BrowserId::Chromium => config.join("chromium"),
        BrowserId::Edge => config.join("microsoft-edge"),
        BrowserId::Brave => config.join("BraveSoftware/Brave-Browser"),
        BrowserId::Firefox => home.join(".mozilla/firefox"),
    })
}

#[cfg(target_os = "macos")]
fn user_data_dir(browser: BrowserId) -> Option<PathBuf> {
    let support = dirs::home_dir()?.join("Library/Application Support");
    Some(match browser {
        BrowserId::Chrome => support.join("Google/Chrome"),
        BrowserId::Chromium => support.join("Chromium"),
        BrowserId::Edge => support.join("Microsoft Edge"),
        BrowserId::Brave => support.join("BraveSoftware/Brave-Browser"),
        BrowserId::Firefox => support.join("Firefox/Profiles"),
    })
}

#[cfg(target_os = "windows")]
fn user_data_dir(browser: BrowserId) -> Option<PathBuf> {
    Some(match browser {
        BrowserId::Chrome => dirs::data_local_dir()?.join(r"Google\Chrome\User Data"),
        BrowserId::Chromium => dirs::data_local_dir()?.join(r"Chromium\User Data"),
        BrowserId::Edge => dirs::data_local_dir()?.join(r"Microsoft\Edge\User Data"),
        BrowserId::Brave => dirs::data_local_dir()?.join(r"BraveSoftware\Brave-Browser\User Data"),
        BrowserId::Firefox => dirs::data_dir()?.join(r"Mozilla\Firefox\Profiles"),
    })
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn user_data_dir(_browser: BrowserId) -> Option<PathBuf> {
    None
}

/// Default location of a browser's bookmarks on this platform.
#[must_use]
pub fn default_location(browser: BrowserId) -> Option<BrowserLocation> {
    let base = user_data_dir(browser)?;
    Some(match browser.kind() {
        BrowserKind::Chromium => {
            let profile = base.join(CHROMIUM_DEFAULT_PROFILE);
            BrowserLocation {
                browser,
                bookmarks: profile.join(CHROMIUM_BOOKMARKS_FILE),
                favicons: Some(profile.join(CHROMIUM_FAVICONS_DB)),
            }
        }
        BrowserKind::Firefox => BrowserLocation {
            browser,
            bookmarks: base,
            favicons: None,
        },
    })
}

/// Location of a browser after applying config overrides.
///
/// An overridden Chromium `Bookmarks` path without an explicit favicon
/// override picks up the `Favicons` file next to it.
#[must_use]
pub fn resolve_location(config: &AppConfig, browser: BrowserId) -> Option<BrowserLocation> {
    let overrides = config.browsers.paths.get(&browser);
    let default = default_location(browser);

    let bookmarks = overrides
        .and_then(|o| o.bookmarks.clone())
        .or_else(|| default.as_ref().map(|d| d.bookmarks.clone()))?;

    let favicons = match browser.kind() {
        BrowserKind::Firefox => None,
        BrowserKind::Chromium => overrides
            .and_then(|o| o.favicons.clone())
            .or_else(|| {
                if overrides.is_some_and(|o| o.bookmarks.is_some()) {
                    Some(bookmarks.with_file_name(CHROMIUM_FAVICONS_DB))
                } else {
                    default.and_then(|d| d.favicons)
                }
            }),
    };

    Some(BrowserLocation {
        browser,
        bookmarks,
        favicons,
    })
}

/// Finds `places.sqlite` under a Firefox profiles path.
///
/// `path` may point at the database itself. Otherwise the tree is searched
/// depth-first in sorted order and the first match wins.
#[must_use]
pub fn find_places_database(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return (path.file_name()? == PLACES_DB_NAME).then(|| path.to_path_buf());
    }

    if !path.is_dir() {
        return None;
    }

    let candidate = path.join(PLACES_DB_NAME);
    if candidate.is_file() {
        tracing::debug!("Found places database: {}", candidate.display());
        return Some(candidate);
    }

    let mut subdirs: Vec<PathBuf> = match fs::read_dir(path) {
        Ok(entries) => entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to read profile directory {}: {}", path.display(), e);
            return None;
        }
    };
    subdirs.sort();

    subdirs.iter().find_map(|dir| find_places_database(dir))
}
