//! Typed failures surfaced by the library. The TUI renders every variant as a
//! footer message and stays usable afterwards, so none of these are fatal.

use thiserror::Error;

use crate::models::VerseId;

/// Errors returned by [`crate::VerseStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Nickname must not be blank.")]
    InvalidNickname,
    #[error("Verse {verse_id} is already bookmarked for {nickname}.")]
    DuplicateBookmark { nickname: String, verse_id: VerseId },
    #[error("Verse {verse_id} is not bookmarked for {nickname}.")]
    NotFound { nickname: String, verse_id: VerseId },
    #[error("Verse {0} is not in the catalog.")]
    UnknownVerse(VerseId),
    #[error("Bookmark storage is unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}

/// Failures raised by a [`crate::storage::KeyValueStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded { limit: usize },
    #[error("failed to encode value for storage")]
    Encode(#[source] serde_json::Error),
    #[error("stored value under {key} is corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Problems detected while loading a verse catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("verse catalog is empty")]
    Empty,
    #[error("verse id {0} appears more than once in the catalog")]
    DuplicateId(VerseId),
    #[error("failed to parse verse catalog")]
    Parse(#[from] serde_json::Error),
}
