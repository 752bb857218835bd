//! Domain models shared by the store, the storage layer and the TUI. These
//! stay light-weight data holders; validation lives on the constructors so the
//! rest of the crate can trust whatever it is handed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Stable identifier of a catalog verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseId(pub u32);

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VerseId {
    fn from(value: u32) -> Self {
        VerseId(value)
    }
}

/// A single catalog entry. Verses are read-only reference data loaded once at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub id: VerseId,
    /// Citation such as `Psalm 23:1`.
    pub reference: String,
    pub text: String,
}

impl Verse {
    pub fn new(id: u32, reference: &str, text: &str) -> Self {
        Self {
            id: VerseId(id),
            reference: reference.to_string(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference)
    }
}

/// User-chosen identity that partitions bookmark storage. Surrounding
/// whitespace is dropped; what remains must be non-empty. Matching is
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nickname(String);

impl Nickname {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidNickname);
        }
        Ok(Nickname(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved association between a nickname and a verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub nickname: Nickname,
    pub verse_id: VerseId,
    pub saved_at: DateTime<Utc>,
}

/// Stored shape of a bookmark. The nickname is implied by the storage key so
/// it is not repeated in every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BookmarkRecord {
    pub(crate) verse_id: VerseId,
    pub(crate) saved_at: DateTime<Utc>,
}

impl BookmarkRecord {
    pub(crate) fn into_bookmark(self, nickname: &Nickname) -> Bookmark {
        Bookmark {
            nickname: nickname.clone(),
            verse_id: self.verse_id,
            saved_at: self.saved_at,
        }
    }
}

/// A bookmark resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVerse {
    pub bookmark: Bookmark,
    pub verse: Verse,
}
