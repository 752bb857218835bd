//! The verse store: random selection over the catalog plus per-nickname
//! bookmark lists kept in key-value storage.
//!
//! Each nickname owns one storage key (`verse-tap.bookmarks.<nickname>`) whose
//! value is a JSON array of `{ verse_id, saved_at }` records, oldest first.
//! Listing reverses that so the most recent save shows on top. Every mutation
//! writes the whole list back before returning, and nothing in memory changes
//! when that write fails.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::VerseCatalog;
use crate::error::{StorageError, StoreError};
use crate::models::{Bookmark, BookmarkRecord, Nickname, SavedVerse, Verse, VerseId};
use crate::random::RandomSource;
use crate::storage::KeyValueStorage;

/// Prefix of every bookmark list key; the nickname follows verbatim.
pub const BOOKMARK_KEY_PREFIX: &str = "verse-tap.bookmarks.";
/// Key holding the nickname last used on this device.
pub const LAST_NICKNAME_KEY: &str = "verse-tap.session.nickname";

pub struct VerseStore<S, R> {
    catalog: VerseCatalog,
    storage: S,
    random: R,
    /// Catalog position of the verse handed out last, so it is not repeated.
    previous: Option<usize>,
}

impl<S: KeyValueStorage, R: RandomSource> VerseStore<S, R> {
    pub fn new(catalog: VerseCatalog, storage: S, random: R) -> Self {
        Self {
            catalog,
            storage,
            random,
            previous: None,
        }
    }

    pub fn catalog(&self) -> &VerseCatalog {
        &self.catalog
    }

    pub fn verse(&self, id: VerseId) -> Option<&Verse> {
        self.catalog.get(id)
    }

    /// Pick a verse uniformly at random, skipping the one returned by the
    /// previous call whenever the catalog has an alternative.
    pub fn random_verse(&mut self) -> &Verse {
        let len = self.catalog.len();
        let position = match self.previous {
            Some(previous) if len > 1 => {
                // Draw from the other len - 1 slots, then step over `previous`.
                let drawn = self.random.next_index(len - 1);
                if drawn >= previous {
                    drawn + 1
                } else {
                    drawn
                }
            }
            _ => self.random.next_index(len),
        };
        self.previous = Some(position);
        &self.catalog.verses()[position]
    }

    /// Append `verse_id` to the nickname's list.
    pub fn save_bookmark(
        &mut self,
        nickname: &str,
        verse_id: VerseId,
    ) -> Result<Bookmark, StoreError> {
        let nickname = Nickname::parse(nickname)?;
        if !self.catalog.contains(verse_id) {
            return Err(StoreError::UnknownVerse(verse_id));
        }

        let mut records = self.load_records(&nickname)?;
        if records.iter().any(|record| record.verse_id == verse_id) {
            return Err(StoreError::DuplicateBookmark {
                nickname: nickname.to_string(),
                verse_id,
            });
        }

        let record = BookmarkRecord {
            verse_id,
            saved_at: Utc::now(),
        };
        records.push(record.clone());
        self.store_records(&nickname, &records)?;

        info!(nickname = %nickname, verse = %verse_id, "bookmark saved");
        Ok(record.into_bookmark(&nickname))
    }

    /// Bookmarked verses for `nickname`, most recent first. Unknown or blank
    /// nicknames simply have nothing saved.
    pub fn list_bookmarks(&self, nickname: &str) -> Result<Vec<Verse>, StoreError> {
        Ok(self
            .bookmarks(nickname)?
            .into_iter()
            .map(|saved| saved.verse)
            .collect())
    }

    /// Like [`Self::list_bookmarks`] but keeps the bookmark metadata.
    pub fn bookmarks(&self, nickname: &str) -> Result<Vec<SavedVerse>, StoreError> {
        let Ok(nickname) = Nickname::parse(nickname) else {
            return Ok(Vec::new());
        };

        let records = self.load_records(&nickname)?;
        let mut saved = Vec::with_capacity(records.len());
        for record in records.into_iter().rev() {
            match self.catalog.get(record.verse_id) {
                Some(verse) => saved.push(SavedVerse {
                    verse: verse.clone(),
                    bookmark: record.into_bookmark(&nickname),
                }),
                None => {
                    warn!(
                        nickname = %nickname,
                        verse = %record.verse_id,
                        "skipping bookmark for verse missing from catalog"
                    );
                }
            }
        }
        Ok(saved)
    }

    pub fn is_bookmarked(&self, nickname: &str, verse_id: VerseId) -> Result<bool, StoreError> {
        let Ok(nickname) = Nickname::parse(nickname) else {
            return Ok(false);
        };
        Ok(self
            .load_records(&nickname)?
            .iter()
            .any(|record| record.verse_id == verse_id))
    }

    /// Drop one bookmark. Removing the last entry deletes the key itself.
    pub fn remove_bookmark(&mut self, nickname: &str, verse_id: VerseId) -> Result<(), StoreError> {
        let nickname = Nickname::parse(nickname)?;
        let mut records = self.load_records(&nickname)?;

        let Some(position) = records.iter().position(|record| record.verse_id == verse_id) else {
            return Err(StoreError::NotFound {
                nickname: nickname.to_string(),
                verse_id,
            });
        };
        records.remove(position);

        if records.is_empty() {
            self.storage.remove(&bookmark_key(&nickname))?;
        } else {
            self.store_records(&nickname, &records)?;
        }

        info!(nickname = %nickname, verse = %verse_id, "bookmark removed");
        Ok(())
    }

    /// Destroy the nickname's whole list, returning how many entries it held.
    /// An unreadable list is still deleted and counts as zero entries.
    pub fn clear_bookmarks(&mut self, nickname: &str) -> Result<usize, StoreError> {
        let nickname = Nickname::parse(nickname)?;
        let count = match self.load_records(&nickname) {
            Ok(records) => records.len(),
            Err(StoreError::StorageUnavailable(StorageError::Corrupt { key, source })) => {
                warn!(key = %key, error = %source, "discarding unreadable bookmark list");
                0
            }
            Err(err) => return Err(err),
        };
        self.storage.remove(&bookmark_key(&nickname))?;
        info!(nickname = %nickname, count, "bookmarks cleared");
        Ok(count)
    }

    /// Nicknames that currently own a bookmark list, sorted.
    pub fn nicknames(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.storage.keys_with_prefix(BOOKMARK_KEY_PREFIX)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(BOOKMARK_KEY_PREFIX).map(str::to_string))
            .collect())
    }

    /// Persist the nickname so the next session can start with it.
    pub fn remember_nickname(&mut self, nickname: &str) -> Result<Nickname, StoreError> {
        let nickname = Nickname::parse(nickname)?;
        self.storage.set(LAST_NICKNAME_KEY, nickname.as_str())?;
        Ok(nickname)
    }

    pub fn last_nickname(&self) -> Result<Option<Nickname>, StoreError> {
        let stored = self.storage.get(LAST_NICKNAME_KEY)?;
        Ok(stored.and_then(|raw| Nickname::parse(&raw).ok()))
    }

    fn load_records(&self, nickname: &Nickname) -> Result<Vec<BookmarkRecord>, StoreError> {
        let key = bookmark_key(nickname);
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(Vec::new());
        };
        let records: Vec<BookmarkRecord> = serde_json::from_str(&raw)
            .map_err(|source| StorageError::Corrupt { key, source })?;
        debug!(nickname = %nickname, count = records.len(), "bookmarks loaded");
        Ok(records)
    }

    fn store_records(
        &mut self,
        nickname: &Nickname,
        records: &[BookmarkRecord],
    ) -> Result<(), StoreError> {
        let key = bookmark_key(nickname);
        let raw = serde_json::to_string(records).map_err(StorageError::Encode)?;
        self.storage.set(&key, &raw)?;
        Ok(())
    }
}

fn bookmark_key(nickname: &Nickname) -> String {
    format!("{BOOKMARK_KEY_PREFIX}{nickname}")
}
