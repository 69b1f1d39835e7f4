//! Tri-state result for reading optional inputs.

use std::path::PathBuf;

/// Result of reading an input that may legitimately be absent or damaged.
///
/// Neither `NotFound` nor `Malformed` is fatal: callers log them and carry on
/// with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The input was read successfully.
    Found(T),
    /// Nothing exists at the given path.
    NotFound(PathBuf),
    /// The input exists but could not be read or parsed.
    Malformed(String),
}

impl<T: Default> Outcome<T> {
    /// Returns the found value, or the default for missing/malformed input.
    pub fn into_found_or_default(self) -> T {
        match self {
            Self::Found(value) => value,
            Self::NotFound(_) | Self::Malformed(_) => T::default(),
        }
    }
}
