use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{BookRecord, ReadingStatus};

/// Build the text lines for one book card: title row, authors, then a
/// metadata row combining the publish year with the subject list. The status
/// tag only appears for shelf entries; search results have no status yet.
pub(crate) fn build_book_card_lines(
    record: &BookRecord,
    selected: bool,
    moving: bool,
) -> Vec<Line<'static>> {
    let marker = if moving {
        "⇅ "
    } else if selected {
        "▶ "
    } else {
        ""
    };

    let mut title_spans = vec![Span::styled(
        format!("{marker}{}", record.title),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = record.status {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            format!("[{status}]"),
            Style::default().fg(status_color(status)),
        ));
    }

    vec![
        Line::from(title_spans),
        Line::from(Span::styled(
            record.authors.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("{} • {}", record.published_date, record.subject),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

pub(crate) fn status_color(status: ReadingStatus) -> Color {
    match status {
        ReadingStatus::Read => Color::Green,
        ReadingStatus::WantToRead => Color::Cyan,
    }
}

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for modal dialogs.
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

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
