use std::cmp::min;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::catalog::{CatalogEvent, CatalogWorker};
use crate::models::{BookRecord, ReadingStatus, StatusFilter};
use crate::storage::{ShelfStore, StorageBackend};

use super::forms::{ConfirmRemove, SearchInput};
use super::helpers::{build_book_card_lines, centered_rect, surface_error};
use super::screens::{DetailBody, DetailState, SearchScreen, ShelfScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per book card in list views.
const BOOK_CARD_HEIGHT: u16 = 5;
/// How far PageUp/PageDown jump through a list.
const PAGE_JUMP: isize = 5;

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts do.
enum Screen {
    Shelf,
    Search,
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    EnteringQuery(SearchInput),
    ConfirmRemove(ConfirmRemove),
    /// Reordering: the record with `source_id` has been picked up and will
    /// be dropped immediately before whichever record is highlighted.
    Moving {
        source_id: String,
    },
    Detail(DetailState),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
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

/// Central application state shared across the TUI. Both list screens stay
/// alive at once so switching between shelf and search never loses results.
pub struct App<B: StorageBackend> {
    store: ShelfStore<B>,
    worker: CatalogWorker,
    shelf: ShelfScreen,
    search: SearchScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Generation of the search response the UI is waiting on; anything else
    /// that arrives is stale and gets dropped.
    pending_search: Option<u64>,
    pending_details: Option<u64>,
}

impl<B: StorageBackend> App<B> {
    pub fn new(store: ShelfStore<B>, worker: CatalogWorker, records: Vec<BookRecord>) -> Self {
        Self {
            store,
            worker,
            shelf: ShelfScreen::new(records),
            search: SearchScreen::new(),
            screen: Screen::Shelf,
            mode: Mode::Normal,
            status: None,
            pending_search: None,
            pending_details: None,
        }
    }

    /// Drain catalog responses that arrived since the last tick.
    pub fn poll_catalog(&mut self) {
        for event in self.worker.poll() {
            self.apply_catalog_event(event);
        }
    }

    /// Apply one catalog response. Responses whose generation no longer
    /// matches the pending one were superseded by a newer request and are
    /// discarded unseen.
    fn apply_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::SearchResults {
                generation,
                results,
            } => {
                if self.pending_search != Some(generation) {
                    debug!(generation, "discarding stale search response");
                    return;
                }
                self.pending_search = None;
                let count = results.len();
                self.search.set_results(results);
                if count == 0 {
                    self.clear_status();
                } else {
                    self.set_status(format!("Found {count} books."), StatusKind::Info);
                }
            }
            CatalogEvent::Details {
                generation,
                details,
            } => {
                if self.pending_details != Some(generation) {
                    debug!(generation, "discarding stale detail response");
                    return;
                }
                self.pending_details = None;
                if let Mode::Detail(state) = &mut self.mode {
                    state.body = match details {
                        Some(details) => DetailBody::Loaded(details),
                        None => DetailBody::Failed,
                    };
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EnteringQuery(input) => self.handle_query_input(code, input),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
            Mode::Moving { source_id } => self.handle_moving(code, source_id),
            Mode::Detail(state) => self.handle_detail(code, state),
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Shelf => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                }
                KeyCode::Up => self.shelf.move_selection(-1),
                KeyCode::Down => self.shelf.move_selection(1),
                KeyCode::PageUp => self.shelf.move_selection(-PAGE_JUMP),
                KeyCode::PageDown => self.shelf.move_selection(PAGE_JUMP),
                KeyCode::Home => self.shelf.select_first(),
                KeyCode::End => self.shelf.select_last(),
                KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.clear_status();
                    self.screen = Screen::Search;
                    return Mode::EnteringQuery(SearchInput::with_query(&self.search.query));
                }
                KeyCode::Char('f') | KeyCode::Tab => {
                    self.shelf.filter = self.shelf.filter.cycled();
                    self.run_store_action(Self::refresh_shelf);
                    self.set_status(
                        format!("Filter: {}.", self.shelf.filter),
                        StatusKind::Info,
                    );
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.run_store_action(Self::toggle_selected_status);
                }
                KeyCode::Char('-') | KeyCode::Delete => {
                    if let Some(record) = self.shelf.current().cloned() {
                        self.clear_status();
                        return Mode::ConfirmRemove(ConfirmRemove::from_record(&record));
                    }
                    self.set_status("No book selected to remove.", StatusKind::Error);
                }
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    if self.shelf.records.len() < 2 {
                        self.set_status("Nothing to reorder.", StatusKind::Error);
                    } else if let Some(record) = self.shelf.current().cloned() {
                        self.set_status(
                            format!("Moving \"{}\".", record.title),
                            StatusKind::Info,
                        );
                        return Mode::Moving {
                            source_id: record.id,
                        };
                    }
                }
                KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('D') => {
                    if let Some(record) = self.shelf.current().cloned() {
                        return self.open_detail(&record);
                    }
                    self.set_status("No book selected.", StatusKind::Error);
                }
                KeyCode::Char('o') | KeyCode::Char('O') => {
                    if let Some(record) = self.shelf.current().cloned() {
                        self.open_catalog_page(&record);
                    }
                }
                _ => {}
            },
            Screen::Search => match code {
                KeyCode::Char('q') => {
                    *exit = true;
                }
                KeyCode::Esc => {
                    self.clear_status();
                    self.screen = Screen::Shelf;
                    self.run_store_action(Self::refresh_shelf);
                }
                KeyCode::Up => self.search.move_selection(-1),
                KeyCode::Down => self.search.move_selection(1),
                KeyCode::PageUp => self.search.move_selection(-PAGE_JUMP),
                KeyCode::PageDown => self.search.move_selection(PAGE_JUMP),
                KeyCode::Home => self.search.select_first(),
                KeyCode::End => self.search.select_last(),
                KeyCode::Char('/') | KeyCode::Char('e') | KeyCode::Char('E') => {
                    self.clear_status();
                    return Mode::EnteringQuery(SearchInput::with_query(&self.search.query));
                }
                KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => {
                    self.run_store_action(Self::add_selected_to_shelf);
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    if let Some(record) = self.search.current().cloned() {
                        return self.open_detail(&record);
                    }
                    self.set_status("No result selected.", StatusKind::Error);
                }
                KeyCode::Char('o') | KeyCode::Char('O') => {
                    if let Some(record) = self.search.current().cloned() {
                        self.open_catalog_page(&record);
                    }
                }
                _ => {}
            },
        }
        Mode::Normal
    }

    fn handle_query_input(&mut self, code: KeyCode, mut input: SearchInput) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => match input.submitted() {
                Some(query) => {
                    self.clear_status();
                    self.search.query = query.clone();
                    self.search.results.clear();
                    self.search.selected = 0;
                    self.search.loading = true;
                    self.pending_search = Some(self.worker.submit_search(&query));
                    return Mode::Normal;
                }
                None => {
                    self.set_status("Search query is required.", StatusKind::Error);
                }
            },
            KeyCode::Backspace => input.backspace(),
            KeyCode::Char(ch) => {
                input.push_char(ch);
            }
            _ => {}
        }
        Mode::EnteringQuery(input)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.run_store_action(|app| app.remove_book(&confirm));
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    fn handle_moving(&mut self, code: KeyCode, source_id: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Move cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Up => self.shelf.move_selection(-1),
            KeyCode::Down => self.shelf.move_selection(1),
            KeyCode::Home => self.shelf.select_first(),
            KeyCode::End => self.shelf.select_last(),
            KeyCode::Enter => {
                let Some(target) = self.shelf.current().cloned() else {
                    self.set_status("No drop target selected.", StatusKind::Error);
                    return Mode::Normal;
                };
                if target.id == source_id {
                    self.set_status("Book left in place.", StatusKind::Info);
                    return Mode::Normal;
                }
                self.run_store_action(|app| app.move_book(&source_id, &target));
                return Mode::Normal;
            }
            _ => {}
        }
        Mode::Moving { source_id }
    }

    fn handle_detail(&mut self, code: KeyCode, state: DetailState) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.pending_details = None;
                Mode::Normal
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let url = format!("https://openlibrary.org/works/{}", state.olid);
                if let Err(err) = open_link(&url) {
                    self.set_status(format!("Failed to open browser: {err}"), StatusKind::Error);
                } else {
                    self.set_status(format!("Opened {url}."), StatusKind::Info);
                }
                Mode::Detail(state)
            }
            _ => Mode::Detail(state),
        }
    }

    /// Run a store interaction and surface any storage failure in the footer
    /// instead of tearing down the UI.
    fn run_store_action(&mut self, action: impl FnOnce(&mut Self) -> Result<()>) {
        if let Err(err) = action(self) {
            let message = surface_error(&err);
            self.set_status(message, StatusKind::Error);
        }
    }

    /// Re-read the shelf view from the store so the screen always reflects
    /// the persisted state after a mutation.
    fn refresh_shelf(&mut self) -> Result<()> {
        let records = self.store.filter_by_status(self.shelf.filter)?;
        self.shelf.set_records(records);
        Ok(())
    }

    fn toggle_selected_status(&mut self) -> Result<()> {
        let Some(record) = self.shelf.current() else {
            self.set_status("No book selected.", StatusKind::Error);
            return Ok(());
        };
        let id = record.id.clone();
        let title = record.title.clone();
        let next = record
            .status
            .map_or(ReadingStatus::WantToRead, ReadingStatus::toggled);

        if self.store.update_status(&id, next)? {
            self.refresh_shelf()?;
            self.set_status(format!("Marked \"{title}\" as {next}."), StatusKind::Info);
        } else {
            self.set_status("Book is no longer on the shelf.", StatusKind::Error);
        }
        Ok(())
    }

    fn add_selected_to_shelf(&mut self) -> Result<()> {
        let Some(record) = self.search.current().cloned() else {
            self.set_status("No result selected.", StatusKind::Error);
            return Ok(());
        };

        if self.store.save(&record, None)? {
            self.refresh_shelf()?;
            self.set_status(
                format!("Added \"{}\" to your shelf.", record.title),
                StatusKind::Info,
            );
        } else {
            self.set_status(
                format!("\"{}\" is already on your shelf.", record.title),
                StatusKind::Error,
            );
        }
        Ok(())
    }

    fn remove_book(&mut self, confirm: &ConfirmRemove) -> Result<()> {
        if self.store.remove(&confirm.id)? {
            self.refresh_shelf()?;
            self.set_status(
                format!("Removed \"{}\" from your shelf.", confirm.title),
                StatusKind::Info,
            );
        } else {
            self.set_status("Book was not on the shelf.", StatusKind::Error);
        }
        Ok(())
    }

    fn move_book(&mut self, source_id: &str, target: &BookRecord) -> Result<()> {
        if self.store.reorder(source_id, &target.id)? {
            self.refresh_shelf()?;
            self.set_status(
                format!("Moved book before \"{}\".", target.title),
                StatusKind::Info,
            );
        } else {
            self.set_status("Could not move the book.", StatusKind::Error);
        }
        Ok(())
    }

    fn open_detail(&mut self, record: &BookRecord) -> Mode {
        let state = DetailState::loading(record);
        self.pending_details = Some(self.worker.submit_details(&state.olid));
        self.clear_status();
        Mode::Detail(state)
    }

    fn open_catalog_page(&mut self, record: &BookRecord) {
        let url = record.catalog_url();
        if let Err(err) = open_link(&url) {
            self.set_status(format!("Failed to open browser: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {url}."), StatusKind::Info);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
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

        match self.screen {
            Screen::Shelf => self.draw_shelf(frame, content_area),
            Screen::Search => self.draw_search(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::EnteringQuery(input) => self.draw_query_bar(frame, area, input),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Detail(state) => self.draw_detail_modal(frame, area, state),
            Mode::Normal | Mode::Moving { .. } => {}
        }
    }

    fn draw_shelf(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("Bookshelf", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "  •  {} ({} books)",
                self.shelf.filter,
                self.shelf.records.len()
            )),
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Shelf"));
        frame.render_widget(header, chunks[0]);

        if self.shelf.records.is_empty() {
            let message = match self.shelf.filter {
                StatusFilter::All => "No books in your bookshelf yet. Press '/' to search.",
                StatusFilter::Read => "No books marked as read yet.",
                StatusFilter::WantToRead => "No books marked want-to-read yet.",
            };
            let message = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let moving_id = match &self.mode {
            Mode::Moving { source_id } => Some(source_id.as_str()),
            _ => None,
        };
        self.render_book_cards(
            frame,
            chunks[1],
            &self.shelf.records,
            self.shelf.selected,
            moving_id,
        );
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let query_text = if self.search.query.is_empty() {
            Span::styled("<no search yet>", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.search.query.clone())
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Search", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  •  "),
            query_text,
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Catalog"));
        frame.render_widget(header, chunks[0]);

        if self.search.loading {
            let message = Paragraph::new("Searching books...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        if self.search.results.is_empty() {
            let text = if self.search.searched {
                "No books found. Try a different search term."
            } else {
                "Press '/' to enter a search."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_book_cards(
            frame,
            chunks[1],
            &self.search.results,
            self.search.selected,
            None,
        );
    }

    fn render_book_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        records: &[BookRecord],
        selected: usize,
        moving_id: Option<&str>,
    ) {
        if records.is_empty() || area.height == 0 {
            return;
        }

        let card_height = BOOK_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = records.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let record_index = start + idx;
            if record_index >= len {
                break;
            }

            let record = &records[record_index];
            let is_moving = moving_id.is_some_and(|id| id == record.id);
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_moving {
                block = block.style(Style::default().fg(Color::Magenta));
                paragraph_style = Style::default().fg(Color::Magenta);
            } else if record_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let lines =
                build_book_card_lines(record, record_index == selected, is_moving);
            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
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

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_query_bar(&self, frame: &mut Frame, area: Rect, input: &SearchInput) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search the Catalog");
        let paragraph = Paragraph::new(Span::raw(format!("Query: {}", input.query)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Remove Book").borders(Borders::ALL);
        let lines = vec![
            Line::from(format!(
                "Remove \"{}\" from your shelf?",
                confirm.title
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(Color::Red)),
                Span::raw(" Remove   "),
                Span::styled("[n]", Style::default().fg(Color::Green)),
                Span::raw(" Cancel"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_detail_modal(&self, frame: &mut Frame, area: Rect, state: &DetailState) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Details").borders(Borders::ALL);

        let lines = match &state.body {
            DetailBody::Loading => vec![
                Line::from(Span::styled(
                    state.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("Loading book details..."),
            ],
            DetailBody::Failed => vec![
                Line::from(Span::styled(
                    "Error",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("Could not load book details. Please try again."),
            ],
            DetailBody::Loaded(details) => vec![
                Line::from(Span::styled(
                    details.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    details.subjects.clone(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
                Line::from(details.description.clone()),
                Line::from(""),
                Line::from(Span::styled(
                    details.cover_image.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::EnteringQuery(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmRemove(_)) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[n]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Moving { .. }) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Choose Target   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Drop Before   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Detail(_)) => Line::from(vec![
                Span::styled("[o]", key_style),
                Span::raw(" Open in Browser   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]),
            (Screen::Search, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Add to Shelf   "),
                Span::styled("[d]", key_style),
                Span::raw(" Details   "),
                Span::styled("[/]", key_style),
                Span::raw(" Edit Query   "),
                Span::styled("[o]", key_style),
                Span::raw(" Browser   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Shelf   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Shelf, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[f]", key_style),
                Span::raw(" Filter   "),
                Span::styled("[r]", key_style),
                Span::raw(" Status   "),
                Span::styled("[m]", key_style),
                Span::raw(" Move   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[o]", key_style),
                Span::raw(" Browser   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use crate::catalog::CatalogClient;
    use crate::models::WorkDetails;
    use crate::storage::MemoryStore;

    use super::*;

    fn record(olid: &str) -> BookRecord {
        BookRecord {
            id: format!("/works/{olid}"),
            title: format!("Title {olid}"),
            authors: "Author".to_string(),
            description: "Click for more details".to_string(),
            cover_image: "https://via.placeholder.com/128x192?text=No+Cover".to_string(),
            published_date: "1990".to_string(),
            olid: olid.to_string(),
            subject: "Fiction".to_string(),
            status: None,
        }
    }

    fn app() -> App<MemoryStore> {
        let store = ShelfStore::new(MemoryStore::default());
        let worker = CatalogWorker::spawn(CatalogClient::new().unwrap());
        App::new(store, worker, Vec::new())
    }

    fn search_results(generation: u64, olid: &str) -> CatalogEvent {
        CatalogEvent::SearchResults {
            generation,
            results: vec![record(olid)],
        }
    }

    #[test]
    fn superseded_search_response_is_discarded() {
        let mut app = app();
        let stale = app.worker.submit_search("");
        let current = app.worker.submit_search("");
        app.pending_search = Some(current);

        // The older response arrives first but the UI is no longer waiting
        // on its generation, so nothing lands.
        app.apply_catalog_event(search_results(stale, "OLoldW"));
        assert!(app.search.results.is_empty());
        assert_eq!(app.pending_search, Some(current));

        app.apply_catalog_event(search_results(current, "OLnewW"));
        assert_eq!(app.pending_search, None);
        assert_eq!(
            app.search
                .results
                .iter()
                .map(|r| r.olid.as_str())
                .collect::<Vec<_>>(),
            ["OLnewW"]
        );
    }

    #[test]
    fn polling_resolves_only_the_awaited_generation() {
        let mut app = app();
        // Blank queries short-circuit inside the client, so both requests
        // resolve without touching the network.
        let _stale = app.worker.submit_search("");
        let current = app.worker.submit_search("");
        app.pending_search = Some(current);

        // Responses come back in submission order, so once the pending wait
        // clears both generations have passed through the discard check.
        for _ in 0..200 {
            app.poll_catalog();
            if app.pending_search.is_none() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(app.pending_search, None);
        assert!(app.search.searched);
    }

    #[test]
    fn superseded_detail_response_is_discarded() {
        let mut app = app();
        app.mode = Mode::Detail(DetailState::loading(&record("OLdetW")));
        app.pending_details = Some(2);

        app.apply_catalog_event(CatalogEvent::Details {
            generation: 1,
            details: Some(WorkDetails {
                title: "Old".to_string(),
                description: "Old".to_string(),
                subjects: "Old".to_string(),
                cover_image: "Old".to_string(),
            }),
        });
        assert_eq!(app.pending_details, Some(2));
        assert!(matches!(
            &app.mode,
            Mode::Detail(state) if matches!(state.body, DetailBody::Loading)
        ));

        app.apply_catalog_event(CatalogEvent::Details {
            generation: 2,
            details: None,
        });
        assert_eq!(app.pending_details, None);
        assert!(matches!(
            &app.mode,
            Mode::Detail(state) if matches!(state.body, DetailBody::Failed)
        ));
    }
}
