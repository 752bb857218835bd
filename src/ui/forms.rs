use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Nickname, VerseId};

/// What to do once a nickname has been accepted. Saving or opening bookmarks
/// without a nickname routes through the form first and resumes afterwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AfterNickname {
    #[default]
    Nothing,
    SaveCurrent,
    OpenBookmarks,
}

/// Single-field prompt for the nickname.
#[derive(Debug, Default, Clone)]
pub(crate) struct NicknameForm {
    pub(crate) value: String,
    pub(crate) error: Option<String>,
    pub(crate) then: AfterNickname,
}

impl NicknameForm {
    pub(crate) fn new(then: AfterNickname) -> Self {
        Self {
            then,
            ..Self::default()
        }
    }

    /// Pre-fill with the nickname in use so editing is a tweak, not a retype.
    pub(crate) fn with_current(current: Option<&Nickname>, then: AfterNickname) -> Self {
        Self {
            value: current.map(|n| n.as_str().to_string()).unwrap_or_default(),
            error: None,
            then,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let (display, style) = if self.value.is_empty() {
            ("<required>".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (self.value.clone(), Style::default().fg(Color::Yellow))
        };
        Line::from(vec![Span::raw("Nickname: "), Span::styled(display, style)])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Pending removal of one bookmark.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmBookmarkRemove {
    pub(crate) verse_id: VerseId,
    pub(crate) reference: String,
}

/// Pending removal of every bookmark for the active nickname.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmBookmarkClear {
    pub(crate) nickname: Nickname,
    pub(crate) count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_ignored() {
        let mut form = NicknameForm::new(AfterNickname::Nothing);
        assert!(form.push_char('d'));
        assert!(!form.push_char('\u{7}'));
        assert_eq!(form.value, "d");
        form.backspace();
        assert_eq!(form.value_len(), 0);
    }

    #[test]
    fn prefill_uses_current_nickname() {
        let current = Nickname::parse("dove").unwrap();
        let form = NicknameForm::with_current(Some(&current), AfterNickname::SaveCurrent);
        assert_eq!(form.value, "dove");
        assert_eq!(form.then, AfterNickname::SaveCurrent);
    }
}
