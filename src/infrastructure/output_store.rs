//! The unified bookmarks JSON file.
//!
//! Loads a previous extraction, keeps a single-generation `.bak` copy and
//! atomically rewrites the file.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::domain::{AppError, Outcome, Result, SavedBookmark};

/// Loads the entries of a previous extraction.
///
/// The file must hold a JSON array. Entries without a string `url` are
/// logged and dropped; every other entry is kept, even if it does not match
/// the record layout this tool writes.
#[must_use]
pub fn load_existing(path: &Path) -> Outcome<Vec<SavedBookmark>> {
    if !path.exists() {
        return Outcome::NotFound(path.to_path_buf());
    }

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => return Outcome::Malformed(format!("Failed to read {}: {e}", path.display())),
    };

    let values = match serde_json::from_slice::<Vec<serde_json::Value>>(&content) {
        Ok(values) => values,
        Err(e) => return Outcome::Malformed(format!("Failed to parse {}: {e}", path.display())),
    };

    let mut entries = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match SavedBookmark::from_value(value) {
            Some(SavedBookmark::Foreign(value)) => {
                tracing::debug!("Entry {} of {} kept as-is", index, path.display());
                entries.push(SavedBookmark::Foreign(value));
            }
            Some(entry) => entries.push(entry),
            None => tracing::warn!("Skipping entry {} of {}: no url", index, path.display()),
        }
    }

    Outcome::Found(entries)
}

/// Path of the backup kept next to `path`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".bak");
    path.with_file_name(name)
}

/// Copies the current file to its `.bak` sibling, replacing any older backup.
///
/// Returns the backup path, or `None` if there was nothing to back up.
///
/// # Errors
/// Returns error if the copy fails.
pub fn backup_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup = backup_path(path);
    fs::copy(path, &backup)
        .map_err(|e| AppError::io(format!("Failed to back up {}", path.display()), e))?;

    tracing::info!("Backed up existing bookmarks to {}", backup.display());

    Ok(Some(backup))
}

/// Writes `records` as pretty-printed JSON, replacing `path` atomically.
///
/// # Errors
/// Returns error if serialization, the temp write or the final rename fails.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| AppError::io(format!("Failed to create {}", parent.display()), e))?;

    let content = serde_json::to_string_pretty(records).map_err(AppError::json_parse)?;

    let mut file = NamedTempFile::new_in(parent)
        .map_err(|e| AppError::io("Failed to create temp output file", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::io("Failed to write bookmarks", e))?;

    // Temp files are created owner-only; keep the mode readers already rely on.
    let permissions = fs::metadata(path)
        .map(|meta| meta.permissions())
        .ok()
        .or_else(new_file_permissions);
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| AppError::io("Failed to set output file permissions", e))?;
    }

    file.persist(path)
        .map_err(|e| AppError::io(format!("Failed to replace {}", path.display()), e.error))?;

    tracing::debug!(path = %path.display(), count = records.len(), "Wrote bookmarks");

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
const fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookmarkRecord, BrowserId};
    use tempfile::tempdir;

    fn sample() -> Vec<BookmarkRecord> {
        vec![
            BookmarkRecord::new("Café", "https://café.example/", "Food/Coffee", BrowserId::Chrome)
                .with_dates(Some("2023-11-14T22:13:20.000000Z".into()), None),
            BookmarkRecord::new("", "https://empty.example/", "", BrowserId::Firefox),
        ]
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/data/links_web.json")),
            PathBuf::from("/data/links_web.json.bak")
        );
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("links_web.json");

        write_records(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Café"));
        assert!(text.starts_with("[\n  {\n    \"name\""));

        let expected = sample().into_iter().map(SavedBookmark::from).collect();
        assert_eq!(load_existing(&path), Outcome::Found(expected));
    }

    #[test]
    fn test_load_keeps_entries_it_cannot_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links_web.json");
        fs::write(
            &path,
            r#"[
                {"name": "Ok", "url": "https://ok.example/", "browser": "chrome"},
                {"name": "No browser", "url": "https://nobrowser.example/"},
                {"name": "Safari", "url": "https://safari.example/", "browser": "safari"},
                {"name": "No url"},
                "https://bare.example/"
            ]"#,
        )
        .unwrap();

        let Outcome::Found(entries) = load_existing(&path) else {
            panic!("expected entries");
        };
        let urls: Vec<&str> = entries.iter().map(SavedBookmark::url).collect();
        assert_eq!(
            urls,
            vec!["https://ok.example/", "https://nobrowser.example/", "https://safari.example/"]
        );
        assert!(matches!(entries[0], SavedBookmark::Record(_)));
        assert!(matches!(entries[1], SavedBookmark::Foreign(_)));
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links_web.json");
        assert!(matches!(load_existing(&path), Outcome::NotFound(_)));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_existing(&path), Outcome::Malformed(_)));

        fs::write(&path, r#"{"url": "https://a.example/"}"#).unwrap();
        assert!(matches!(load_existing(&path), Outcome::Malformed(_)));
    }

    #[test]
    fn test_backup_existing_copies_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links_web.json");

        assert_eq!(backup_existing(&path).unwrap(), None);

        fs::write(&path, b"[1, 2").unwrap();
        let backup = backup_existing(&path).unwrap().unwrap();
        assert_eq!(fs::read(backup).unwrap(), b"[1, 2");
    }

    #[test]
    fn test_empty_collection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links_web.json");
        write_records::<BookmarkRecord>(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("links_web.json");

        write_records(&path, &sample()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        write_records::<BookmarkRecord>(&path, &[]).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
