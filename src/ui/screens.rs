use std::cmp::min;

use crate::models::{Nickname, SavedVerse};

/// Bookmark list for one nickname, most recent first.
pub(crate) struct BookmarkScreen {
    pub(crate) nickname: Nickname,
    pub(crate) entries: Vec<SavedVerse>,
    pub(crate) selected: usize,
    /// Stored list could not be parsed; only a clear is offered.
    pub(crate) unreadable: bool,
}

impl BookmarkScreen {
    pub(crate) fn new(nickname: Nickname, entries: Vec<SavedVerse>) -> Self {
        Self {
            nickname,
            entries,
            selected: 0,
            unreadable: false,
        }
    }

    /// Screen for a nickname whose stored list cannot be read.
    pub(crate) fn unreadable(nickname: Nickname) -> Self {
        Self {
            unreadable: true,
            ..Self::new(nickname, Vec::new())
        }
    }

    /// Swap in a fresh list, keeping the cursor on the same row when possible.
    pub(crate) fn replace_entries(&mut self, entries: Vec<SavedVerse>) {
        self.entries = entries;
        self.unreadable = false;
        if self.entries.is_empty() {
            self.selected = 0;
        } else {
            self.selected = min(self.selected, self.entries.len() - 1);
        }
    }

    pub(crate) fn current(&self) -> Option<&SavedVerse> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        let next = (self.selected as isize + offset).clamp(0, last);
        self.selected = next as usize;
    }
}
