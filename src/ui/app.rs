use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::error::{StorageError, StoreError};
use crate::models::{Nickname, Verse};
use crate::random::RandomSource;
use crate::storage::KeyValueStorage;
use crate::store::VerseStore;

use super::forms::{AfterNickname, ConfirmBookmarkClear, ConfirmBookmarkRemove, NicknameForm};
use super::helpers::{centered_rect, format_saved_at, surface_error};
use super::screens::BookmarkScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states.
enum Screen {
    Verse,
    Bookmarks(BookmarkScreen),
}

/// Overlays scoped to the current screen.
enum Mode {
    Normal,
    EditingNickname(NicknameForm),
    ConfirmRemove(ConfirmBookmarkRemove),
    ConfirmClear(ConfirmBookmarkClear),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Session state for the terminal front-end. Owns the store for the lifetime
/// of the session; every key press runs to completion against it.
pub struct App<S, R> {
    store: VerseStore<S, R>,
    nickname: Option<Nickname>,
    current: Verse,
    /// Whether `current` is already in the active nickname's bookmarks.
    current_saved: bool,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<S: KeyValueStorage, R: RandomSource> App<S, R> {
    /// Start a session on a fresh random verse, restoring the nickname used
    /// last time on this device. A storage failure here is reported in the
    /// footer instead of aborting.
    pub fn new(mut store: VerseStore<S, R>) -> Self {
        let (nickname, status) = match store.last_nickname() {
            Ok(nickname) => (nickname, None),
            Err(err) => (
                None,
                Some(StatusMessage {
                    text: surface_error(&err),
                    kind: StatusKind::Error,
                }),
            ),
        };
        let current = store.random_verse().clone();

        let mut app = Self {
            store,
            nickname,
            current,
            current_saved: false,
            screen: Screen::Verse,
            mode: Mode::Normal,
            status,
        };
        app.refresh_saved_marker();
        app
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => match self.screen {
                Screen::Verse => self.handle_verse_key(code, &mut exit),
                Screen::Bookmarks(_) => self.handle_bookmarks_key(code, &mut exit),
            },
            Mode::EditingNickname(form) => self.handle_nickname_form(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
            Mode::ConfirmClear(confirm) => self.handle_confirm_clear(code, confirm),
        };

        exit
    }

    fn handle_verse_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Right => self.next_verse(),
            KeyCode::Char('s') => return self.save_or_prompt(),
            KeyCode::Char('b') => return self.open_bookmarks_or_prompt(),
            KeyCode::Char('u') => {
                return Mode::EditingNickname(NicknameForm::with_current(
                    self.nickname.as_ref(),
                    AfterNickname::Nothing,
                ))
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_bookmarks_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let Screen::Bookmarks(list) = &mut self.screen else {
            return Mode::Normal;
        };

        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.screen = Screen::Verse;
                self.refresh_saved_marker();
                self.clear_status();
            }
            KeyCode::Up => list.move_selection(-1),
            KeyCode::Down => list.move_selection(1),
            KeyCode::Enter => match list.current().map(|entry| entry.verse.clone()) {
                Some(verse) => self.show_verse(verse),
                None => self.set_status("No bookmark selected.", StatusKind::Error),
            },
            KeyCode::Char('d') => {
                if let Some(entry) = list.current() {
                    return Mode::ConfirmRemove(ConfirmBookmarkRemove {
                        verse_id: entry.verse.id,
                        reference: entry.verse.reference.clone(),
                    });
                }
                self.set_status("No bookmark selected.", StatusKind::Error);
            }
            KeyCode::Char('c') => {
                if !list.entries.is_empty() || list.unreadable {
                    return Mode::ConfirmClear(ConfirmBookmarkClear {
                        nickname: list.nickname.clone(),
                        count: list.entries.len(),
                    });
                }
                self.set_status("Nothing to clear.", StatusKind::Info);
            }
            KeyCode::Char('u') => {
                return Mode::EditingNickname(NicknameForm::with_current(
                    self.nickname.as_ref(),
                    AfterNickname::OpenBookmarks,
                ))
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_nickname_form(&mut self, code: KeyCode, mut form: NicknameForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Nickname unchanged.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match Nickname::parse(&form.value) {
                Ok(nickname) => {
                    self.adopt_nickname(nickname, form.then);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EditingNickname(form)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmBookmarkRemove) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.remove_bookmark(&confirm);
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    fn handle_confirm_clear(&mut self, code: KeyCode, confirm: ConfirmBookmarkClear) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.clear_bookmarks(confirm.nickname.as_str()) {
                    Ok(count) => self.set_status(
                        format!("Cleared {count} bookmark(s) for {}.", confirm.nickname),
                        StatusKind::Info,
                    ),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                self.reload_bookmarks();
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Clear cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmClear(confirm),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Verse => self.draw_verse(frame, content_area),
            Screen::Bookmarks(list) => self.draw_bookmarks(frame, content_area, list),
        }

        if area.height > footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::EditingNickname(form) => self.draw_nickname_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::ConfirmClear(confirm) => self.draw_confirm_clear(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_verse(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.nickname {
            Some(nickname) => format!(" Verse for {nickname} "),
            None => " Verse ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let mut lines = vec![
            Line::from(""),
            Line::from(self.current.text.clone()),
            Line::from(""),
            Line::from(Span::styled(
                self.current.reference.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if self.current_saved {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "* bookmarked",
                Style::default().fg(Color::Green),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_bookmarks(&self, frame: &mut Frame, area: Rect, list: &BookmarkScreen) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Bookmarks for {} ({}) ", list.nickname, list.entries.len()));

        if list.entries.is_empty() {
            let hint = if list.unreadable {
                "Saved bookmarks could not be read. Press 'c' to reset the list."
            } else {
                "No bookmarks yet. Go back with Esc and press 's' on a verse."
            };
            let message = Paragraph::new(hint)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = list
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            entry.verse.reference.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  saved {}", format_saved_at(entry.bookmark.saved_at)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::from(entry.verse.text.clone()),
                    Line::from(""),
                ])
            })
            .collect();

        let widget = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let pairs: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::EditingNickname(_)) => &[("[Enter]", " Use   "), ("[Esc]", " Cancel")],
            (_, Mode::ConfirmRemove(_)) | (_, Mode::ConfirmClear(_)) => {
                &[("[Y]", " Confirm   "), ("[N/Esc]", " Cancel")]
            }
            (Screen::Verse, Mode::Normal) => &[
                ("[Space]", " Next   "),
                ("[S]", " Save   "),
                ("[B]", " Bookmarks   "),
                ("[U]", " Nickname   "),
                ("[Q]", " Quit"),
            ],
            (Screen::Bookmarks(_), Mode::Normal) => &[
                ("[\u{2191}\u{2193}]", " Navigate   "),
                ("[Enter]", " Show   "),
                ("[D]", " Remove   "),
                ("[C]", " Clear All   "),
                ("[Esc]", " Back"),
            ],
        };

        let spans: Vec<Span<'static>> = pairs
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_nickname_form(&self, frame: &mut Frame, area: Rect, form: &NicknameForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Nickname").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Bookmarks are kept on this device under your nickname.",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Nickname: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookmarkRemove) {
        let lines = vec![
            Line::from(format!("Remove {} from your bookmarks?", confirm.reference)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];
        self.draw_confirm(frame, area, "Confirm Removal", lines);
    }

    fn draw_confirm_clear(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookmarkClear) {
        let lines = vec![
            Line::from(if confirm.count == 0 {
                format!("Reset the unreadable bookmark list for {}?", confirm.nickname)
            } else {
                format!(
                    "Delete all {} bookmark(s) saved for {}?",
                    confirm.count, confirm.nickname
                )
            }),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];
        self.draw_confirm(frame, area, "Clear Bookmarks", lines);
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn next_verse(&mut self) {
        self.current = self.store.random_verse().clone();
        self.refresh_saved_marker();
        self.clear_status();
    }

    fn show_verse(&mut self, verse: Verse) {
        self.set_status(format!("Showing {}.", verse.reference), StatusKind::Info);
        self.current = verse;
        self.screen = Screen::Verse;
        self.refresh_saved_marker();
    }

    fn save_or_prompt(&mut self) -> Mode {
        match self.nickname.clone() {
            Some(nickname) => {
                self.save_current(&nickname);
                Mode::Normal
            }
            None => Mode::EditingNickname(NicknameForm::new(AfterNickname::SaveCurrent)),
        }
    }

    fn open_bookmarks_or_prompt(&mut self) -> Mode {
        match self.nickname.clone() {
            Some(nickname) => {
                self.open_bookmarks(nickname);
                Mode::Normal
            }
            None => Mode::EditingNickname(NicknameForm::new(AfterNickname::OpenBookmarks)),
        }
    }

    /// Switch to `nickname`, persist it for next time, then resume whatever
    /// action sent the user to the form.
    fn adopt_nickname(&mut self, nickname: Nickname, then: AfterNickname) {
        self.nickname = Some(nickname.clone());
        match self.store.remember_nickname(nickname.as_str()) {
            Ok(_) => self.set_status(format!("Using nickname {nickname}."), StatusKind::Info),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }

        match then {
            AfterNickname::SaveCurrent => self.save_current(&nickname),
            AfterNickname::OpenBookmarks => self.open_bookmarks(nickname),
            AfterNickname::Nothing => self.refresh_saved_marker(),
        }
    }

    fn save_current(&mut self, nickname: &Nickname) {
        match self.store.save_bookmark(nickname.as_str(), self.current.id) {
            Ok(_) => {
                self.current_saved = true;
                self.set_status(
                    format!("Saved {} for {nickname}.", self.current.reference),
                    StatusKind::Info,
                );
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn open_bookmarks(&mut self, nickname: Nickname) {
        match self.store.bookmarks(nickname.as_str()) {
            Ok(entries) => {
                self.screen = Screen::Bookmarks(BookmarkScreen::new(nickname, entries));
            }
            Err(err) => {
                if is_unreadable(&err) {
                    self.screen = Screen::Bookmarks(BookmarkScreen::unreadable(nickname));
                }
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn remove_bookmark(&mut self, confirm: &ConfirmBookmarkRemove) {
        let Some(nickname) = self.nickname.clone() else {
            self.set_status("Choose a nickname first.", StatusKind::Error);
            return;
        };
        match self.store.remove_bookmark(nickname.as_str(), confirm.verse_id) {
            Ok(()) => self.set_status(
                format!("Removed {} from bookmarks.", confirm.reference),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
        self.reload_bookmarks();
    }

    fn reload_bookmarks(&mut self) {
        let Screen::Bookmarks(list) = &mut self.screen else {
            return;
        };
        match self.store.bookmarks(list.nickname.as_str()) {
            Ok(entries) => list.replace_entries(entries),
            Err(err) => {
                list.unreadable = is_unreadable(&err);
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn refresh_saved_marker(&mut self) {
        let Some(nickname) = &self.nickname else {
            self.current_saved = false;
            return;
        };
        match self.store.is_bookmarked(nickname.as_str(), self.current.id) {
            Ok(saved) => self.current_saved = saved,
            Err(err) => {
                self.current_saved = false;
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }
}

fn is_unreadable(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::StorageUnavailable(StorageError::Corrupt { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VerseCatalog;
    use crate::models::VerseId;
    use crate::random::SequenceRandom;
    use crate::storage::MemoryStorage;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    type TestApp = App<MemoryStorage, SequenceRandom>;

    fn store_with(storage: MemoryStorage) -> VerseStore<MemoryStorage, SequenceRandom> {
        let catalog = VerseCatalog::from_verses(vec![
            Verse::new(1, "Psalm 23:1", "The LORD is my shepherd; I shall not want."),
            Verse::new(2, "John 11:35", "Jesus wept."),
            Verse::new(3, "Psalm 119:105", "Thy word is a lamp unto my feet."),
        ])
        .unwrap();
        VerseStore::new(catalog, storage, SequenceRandom::new([0]))
    }

    fn app() -> TestApp {
        App::new(store_with(MemoryStorage::new()))
    }

    fn type_text(app: &mut TestApp, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn status(app: &TestApp) -> (String, StatusKind) {
        let status = app.status.as_ref().expect("status should be set");
        (status.text.clone(), status.kind)
    }

    fn bookmark_ids(app: &TestApp, nickname: &str) -> Vec<VerseId> {
        app.store
            .list_bookmarks(nickname)
            .unwrap()
            .iter()
            .map(|verse| verse.id)
            .collect()
    }

    #[test]
    fn starts_on_first_drawn_verse() {
        let app = app();
        assert_eq!(app.current.id, VerseId(1));
        assert!(app.nickname.is_none());
        assert!(!app.current_saved);
    }

    #[test]
    fn next_verse_never_repeats() {
        let mut app = app();
        let first = app.current.id;
        app.handle_key(KeyCode::Char(' '));
        assert_ne!(app.current.id, first);
    }

    #[test]
    fn saving_without_nickname_prompts_then_saves() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s'));
        assert!(matches!(app.mode, Mode::EditingNickname(_)));

        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.nickname.as_ref().unwrap().as_str(), "dove");
        assert_eq!(bookmark_ids(&app, "dove"), vec![VerseId(1)]);
        assert!(app.current_saved);
        assert_eq!(status(&app), ("Saved Psalm 23:1 for dove.".to_string(), StatusKind::Info));
        assert_eq!(app.store.last_nickname().unwrap().unwrap().as_str(), "dove");
    }

    #[test]
    fn blank_nickname_keeps_form_open() {
        let mut app = app();
        app.handle_key(KeyCode::Char('u'));
        type_text(&mut app, "  ");
        app.handle_key(KeyCode::Enter);

        match &app.mode {
            Mode::EditingNickname(form) => {
                assert_eq!(form.error.as_deref(), Some("Nickname must not be blank."))
            }
            _ => panic!("nickname form should stay open"),
        }
        assert!(app.nickname.is_none());
    }

    #[test]
    fn duplicate_save_reports_error() {
        let mut app = app();
        app.handle_key(KeyCode::Char('u'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('s'));

        let (text, kind) = status(&app);
        assert_eq!(kind, StatusKind::Error);
        assert_eq!(text, "Verse 1 is already bookmarked for dove.");
        assert_eq!(bookmark_ids(&app, "dove").len(), 1);
    }

    #[test]
    fn remove_from_bookmark_screen() {
        let mut app = app();
        app.handle_key(KeyCode::Char('u'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('s'));

        app.handle_key(KeyCode::Char('b'));
        let Screen::Bookmarks(list) = &app.screen else {
            panic!("bookmark screen should be open");
        };
        assert_eq!(list.entries.len(), 2);
        // Most recent first: the second verse saved is on top.
        assert_eq!(list.entries[0].verse.id, VerseId(2));

        app.handle_key(KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmRemove(_)));
        app.handle_key(KeyCode::Char('y'));

        assert_eq!(bookmark_ids(&app, "dove"), vec![VerseId(1)]);
        let Screen::Bookmarks(list) = &app.screen else {
            panic!("bookmark screen should stay open");
        };
        assert_eq!(list.entries.len(), 1);
    }

    #[test]
    fn cancelled_removal_keeps_bookmark() {
        let mut app = app();
        app.handle_key(KeyCode::Char('b'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Esc);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(bookmark_ids(&app, "dove"), vec![VerseId(1)]);
    }

    #[test]
    fn clear_all_bookmarks() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('s'));

        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Char('y'));

        assert!(bookmark_ids(&app, "dove").is_empty());
        assert_eq!(
            status(&app),
            ("Cleared 2 bookmark(s) for dove.".to_string(), StatusKind::Info)
        );
    }

    #[test]
    fn enter_on_bookmark_shows_verse() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.current.id, VerseId(2));

        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.screen, Screen::Verse));
        assert_eq!(app.current.id, VerseId(1));
        assert!(app.current_saved);
    }

    #[test]
    fn restores_last_nickname() {
        let mut storage = MemoryStorage::new();
        storage
            .set(crate::store::LAST_NICKNAME_KEY, "lamb")
            .unwrap();
        let app = App::new(store_with(storage));
        assert_eq!(app.nickname.unwrap().as_str(), "lamb");
    }

    #[test]
    fn full_storage_is_reported_not_fatal() {
        let mut app = App::new(store_with(MemoryStorage::with_quota(40)));
        app.handle_key(KeyCode::Char('s'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);

        let (text, kind) = status(&app);
        assert_eq!(kind, StatusKind::Error);
        assert!(text.starts_with("Bookmark storage is unavailable"));
        assert!(bookmark_ids(&app, "dove").is_empty());
        assert!(!app.current_saved);
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        let mut app = app_on_bookmarks();
        assert!(!app.handle_key(KeyCode::Esc));
        assert!(app.handle_key(KeyCode::Esc));
    }

    fn rendered_text(app: &TestApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn unreadable_list_can_be_reset_from_bookmarks() {
        let mut storage = MemoryStorage::new();
        storage.set("verse-tap.bookmarks.dove", "{not json").unwrap();
        storage.set(crate::store::LAST_NICKNAME_KEY, "dove").unwrap();
        let mut app = App::new(store_with(storage));

        app.handle_key(KeyCode::Char('b'));
        let Screen::Bookmarks(list) = &app.screen else {
            panic!("bookmark screen should open for an unreadable list");
        };
        assert!(list.unreadable);
        assert!(list.entries.is_empty());
        assert_eq!(status(&app).1, StatusKind::Error);

        app.handle_key(KeyCode::Char('c'));
        assert!(matches!(app.mode, Mode::ConfirmClear(ConfirmBookmarkClear { count: 0, .. })));
        app.handle_key(KeyCode::Char('y'));

        assert_eq!(
            status(&app),
            ("Cleared 0 bookmark(s) for dove.".to_string(), StatusKind::Info)
        );
        let Screen::Bookmarks(list) = &app.screen else {
            panic!("bookmark screen should stay open");
        };
        assert!(!list.unreadable);

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(bookmark_ids(&app, "dove"), vec![VerseId(1)]);
    }

    #[test]
    fn short_terminal_skips_footer() {
        let app = app();
        assert!(rendered_text(&app, 80, 20).contains("Next"));

        let cramped = rendered_text(&app, 80, FOOTER_HEIGHT);
        assert!(!cramped.contains("Next"));
        assert!(cramped.contains("Verse"));
    }

    fn app_on_bookmarks() -> TestApp {
        let mut app = app();
        app.handle_key(KeyCode::Char('b'));
        type_text(&mut app, "dove");
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.screen, Screen::Bookmarks(_)));
        app
    }
}
