use std::error::Error;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Footer text for an error: the top-level message, plus the root cause when
/// the chain goes deeper.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let top = err.to_string();
    let mut root = err;
    while let Some(source) = root.source() {
        root = source;
    }
    let cause = root.to_string();
    if top.contains(&cause) {
        top
    } else {
        format!("{top} ({cause})")
    }
}

/// Short local-time stamp shown next to each bookmark.
pub(crate) fn format_saved_at(saved_at: DateTime<Utc>) -> String {
    saved_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
