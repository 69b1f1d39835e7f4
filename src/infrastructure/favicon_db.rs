//! `SQLite` reader for Chromium's `Favicons` database.
//!
//! Looks up the stored icon bitmap for a site's root `favicon.ico` URL.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use url::Url;

use crate::domain::{AppError, Result};

use super::temp_copy::TempDbCopy;

/// Widest bitmap mapped to an exact favicon URL.
const LOOKUP_QUERY: &str = "
    SELECT b.image_data
    FROM favicon_bitmaps b
    JOIN icon_mapping m ON b.icon_id = m.icon_id
    JOIN favicons f ON f.id = m.icon_id
    WHERE f.url = ?1
    ORDER BY b.width DESC
    LIMIT 1";

/// Reader over a private copy of a `Favicons` database.
pub struct FaviconDb {
    conn: Connection,
    _copy: TempDbCopy,
}

impl FaviconDb {
    /// Copies and opens the database at `path`.
    ///
    /// # Errors
    /// Returns error if the file is missing, cannot be copied or opened.
    pub fn open(path: &Path) -> Result<Self> {
        let copy = TempDbCopy::create(path)?;
        let conn = copy.open()?;
        Ok(Self { conn, _copy: copy })
    }

    /// Raw image bytes of the best icon for `page_url`'s site.
    ///
    /// # Errors
    /// Returns error if the query fails (e.g. unexpected schema).
    pub fn lookup(&self, page_url: &str) -> Result<Option<Vec<u8>>> {
        let Some(favicon_url) = favicon_lookup_url(page_url) else {
            return Ok(None);
        };

        let data: Option<Option<Vec<u8>>> = self
            .conn
            .query_row(LOOKUP_QUERY, [&favicon_url], |row| row.get(0))
            .optional()
            .map_err(AppError::database)?;

        Ok(data.flatten().filter(|bytes| !bytes.is_empty()))
    }
}

/// Canonical `favicon.ico` URL for the scheme and host of `page_url`.
#[must_use]
pub fn favicon_lookup_url(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let host = parsed.host_str()?;

    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}/favicon.ico", parsed.scheme()),
        None => format!("{}://{host}/favicon.ico", parsed.scheme()),
    })
}
