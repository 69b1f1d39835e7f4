//! Favicon lookup and data-URI encoding.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::BrowserId;
use crate::infrastructure::FaviconDb;

/// Fallback MIME type when the image format is not recognized.
const DEFAULT_MIME: &str = "image/png";

/// Resolves page URLs to embedded favicons for one browser.
///
/// A missing or unreadable database leaves the fetcher empty; every lookup
/// then yields `None`.
pub struct FaviconFetcher {
    browser: BrowserId,
    db: Option<FaviconDb>,
}

impl FaviconFetcher {
    /// Opens the favicon database at `db_path`, if one is given.
    pub fn open(db_path: Option<&Path>, browser: BrowserId) -> Self {
        let db = db_path.and_then(|path| {
            if !path.exists() {
                tracing::debug!("[{}] No favicon database at {}", browser, path.display());
                return None;
            }
            match FaviconDb::open(path) {
                Ok(db) => Some(db),
                Err(e) => {
                    tracing::warn!(
                        "[{}] Could not read favicons from {}: {}",
                        browser,
                        path.display(),
                        e
                    );
                    None
                }
            }
        });
        Self { browser, db }
    }

    /// Favicon for `page_url` as a data URI.
    pub fn fetch(&self, page_url: &str) -> Option<String> {
        let db = self.db.as_ref()?;
        match db.lookup(page_url) {
            Ok(bytes) => bytes.map(|b| to_data_uri(&b)),
            Err(e) => {
                tracing::warn!("[{}] Favicon lookup failed for {}: {}", self.browser, page_url, e);
                None
            }
        }
    }
}

/// Encodes image bytes as a `data:` URI.
#[must_use]
pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), STANDARD.encode(bytes))
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0, 0, 1, 0]) {
        "image/x-icon"
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if looks_like_svg(bytes) {
        "image/svg+xml"
    } else {
        DEFAULT_MIME
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    String::from_utf8_lossy(head).contains("<svg")
}
