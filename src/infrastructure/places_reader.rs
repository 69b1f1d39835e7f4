//! `SQLite` reader for Firefox's `places.sqlite`.
//!
//! Walks the bookmark tree with a recursive query and returns one row per
//! bookmarked URL together with its folder path.

use std::path::Path;

use rusqlite::Connection;

use crate::domain::{AppError, Result};

use super::temp_copy::TempDbCopy;

/// GUIDs of the top-level bookmark roots that hold user bookmarks.
///
/// The `tags________` root is left out: its children are tag folders, not
/// bookmark locations.
pub const BOOKMARK_ROOT_GUIDS: &[&str] = &[
    "menu________",
    "toolbar_____",
    "unfiled_____",
    "mobile______",
];

/// Legacy (pre-Firefox 55) table storing favicon blobs inside places.sqlite.
const LEGACY_FAVICONS_TABLE: &str = "moz_favicons";

/// Raw bookmark row from the places database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesRow {
    pub title: String,
    pub url: String,
    /// Parent folder path relative to its root, `/`-joined.
    pub category: String,
    /// Microseconds since the Unix epoch.
    pub date_added: Option<i64>,
    /// Microseconds since the Unix epoch.
    pub last_visited: Option<i64>,
    pub favicon: Option<Vec<u8>>,
}

/// Reader over a private copy of a places database.
pub struct PlacesReader {
    conn: Connection,
    _copy: TempDbCopy,
}

impl PlacesReader {
    /// Copies and opens the database at `path`.
    ///
    /// # Errors
    /// Returns error if the file is missing, cannot be copied or opened.
    pub fn open(path: &Path) -> Result<Self> {
        let copy = TempDbCopy::create(path)?;
        let conn = copy.open()?;
        Ok(Self { conn, _copy: copy })
    }

    /// Whether favicon blobs are stored in this database.
    ///
    /// # Errors
    /// Returns error if the schema cannot be queried.
    pub fn has_legacy_favicons(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [LEGACY_FAVICONS_TABLE],
                |row| row.get(0),
            )
            .map_err(AppError::database)?;
        Ok(count > 0)
    }

    /// Fetches every bookmarked URL under the standard roots.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn fetch_bookmarks(&self, include_favicons: bool) -> Result<Vec<PlacesRow>> {
        let with_favicons = include_favicons && self.has_legacy_favicons()?;
        if include_favicons && !with_favicons {
            tracing::debug!("No {} table, favicons unavailable", LEGACY_FAVICONS_TABLE);
        }

        let query = bookmarks_query(with_favicons);
        let mut stmt = self.conn.prepare(&query).map_err(AppError::database)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PlacesRow {
                    title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    url: row.get(1)?,
                    category: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    date_added: row.get(3)?,
                    last_visited: row.get(4)?,
                    favicon: row.get(5)?,
                })
            })
            .map_err(AppError::database)?;

        let mut entries = Vec::new();
        for row in rows {
            match row {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to read bookmark row: {}", e);
                }
            }
        }

        tracing::debug!("Fetched {} bookmark rows", entries.len());

        Ok(entries)
    }
}

fn bookmarks_query(with_favicons: bool) -> String {
    let roots = BOOKMARK_ROOT_GUIDS
        .iter()
        .map(|guid| format!("'{guid}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let favicon_column = if with_favicons {
        "(SELECT fav.data FROM moz_favicons fav WHERE fav.id = p.favicon_id)"
    } else {
        "NULL"
    };

    format!(
        "WITH RECURSIVE
           bookmark_path(id, parent, title, fk, date_added, path) AS (
             SELECT b.id, b.parent, b.title, b.fk, b.dateAdded, COALESCE(b.title, '')
             FROM moz_bookmarks AS b
             WHERE b.parent IN (SELECT id FROM moz_bookmarks WHERE guid IN ({roots}))
             UNION ALL
             SELECT b.id, b.parent, b.title, b.fk, b.dateAdded,
                    bp.path || '/' || COALESCE(b.title, '')
             FROM moz_bookmarks AS b
             JOIN bookmark_path AS bp ON b.parent = bp.id
           )
         SELECT bp.title, p.url, folder.path, bp.date_added, p.last_visit_date, {favicon_column}
         FROM bookmark_path AS bp
         JOIN moz_places AS p ON bp.fk = p.id
         LEFT JOIN bookmark_path AS folder ON folder.id = bp.parent
         WHERE p.url IS NOT NULL
         ORDER BY bp.id"
    )
}
