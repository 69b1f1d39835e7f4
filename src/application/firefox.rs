//! Firefox-family bookmark parsing.

use std::path::Path;

use crate::domain::{is_web_url, BookmarkRecord, BrowserId, Outcome};
use crate::infrastructure::{find_places_database, PlacesReader, PlacesRow};

use super::favicon::to_data_uri;
use super::timestamps::firefox_time_to_iso;

/// Parses bookmarks from the first `places.sqlite` under `profiles_path`.
pub fn parse_firefox_bookmarks(
    profiles_path: &Path,
    browser: BrowserId,
    include_favicons: bool,
) -> Outcome<Vec<BookmarkRecord>> {
    if !profiles_path.exists() {
        tracing::warn!(
            "[{}] Profiles directory not found at: {}",
            browser,
            profiles_path.display()
        );
        return Outcome::NotFound(profiles_path.to_path_buf());
    }

    let Some(db_path) = find_places_database(profiles_path) else {
        tracing::warn!("[{}] places.sqlite not found in any profile.", browser);
        return Outcome::NotFound(profiles_path.to_path_buf());
    };

    tracing::info!("[{}] Parsing bookmarks from {}...", browser, db_path.display());

    let rows = match PlacesReader::open(&db_path).and_then(|r| r.fetch_bookmarks(include_favicons))
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("[{}] Could not read bookmarks database: {}", browser, e);
            return Outcome::Malformed(e.to_string());
        }
    };

    let records: Vec<BookmarkRecord> = rows
        .into_iter()
        .filter_map(|row| row_to_record(row, browser, include_favicons))
        .collect();

    tracing::info!("[{}] Found {} bookmarks.", browser, records.len());

    Outcome::Found(records)
}

fn row_to_record(row: PlacesRow, browser: BrowserId, include_favicons: bool) -> Option<BookmarkRecord> {
    if !is_web_url(&row.url) {
        tracing::debug!("[{}] Skipping non-web bookmark {}", browser, row.url);
        return None;
    }

    let favicon = if include_favicons {
        row.favicon.as_deref().filter(|b| !b.is_empty()).map(to_data_uri)
    } else {
        None
    };

    Some(
        BookmarkRecord::new(row.title, row.url, row.category, browser)
            .with_dates(
                firefox_time_to_iso(row.date_added),
                firefox_time_to_iso(row.last_visited),
            )
            .with_favicon(favicon),
    )
}
