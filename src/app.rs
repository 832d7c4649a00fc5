use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::error::FetchError;
use crate::event::Event;
use crate::forge::Forge;
use crate::search::{FetchState, SearchController, SearchEvent};
use crate::types::Repository;

/// Rows taken by header, status bar and list borders
const CHROME_ROWS: u16 = 4;

pub struct App {
    pub search: SearchController,
    pub selected: usize,
    pub input_mode: bool,
    pub input: String,
    /// Mirrors the controller state, updated from its events
    pub activity: FetchState,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    /// Set when loading more failed; the tick stops asking until the user acts
    append_paused: bool,
    list_rows: usize,
    initial_keyword: Option<String>,
}

fn list_rows(terminal_height: u16) -> usize {
    terminal_height.saturating_sub(CHROME_ROWS) as usize
}

/// Whether row `sentinel` is on screen. The list is drawn with a fresh
/// `ListState` each frame, so it scrolls just far enough to show `selected`.
fn sentinel_visible(sentinel: usize, selected: usize, rows: usize) -> bool {
    rows > 0 && sentinel < rows.max(selected + 1)
}

impl App {
    pub fn new(
        forge: Arc<dyn Forge>,
        action_tx: mpsc::UnboundedSender<Action>,
        initial_keyword: Option<String>,
        terminal_height: u16,
    ) -> Self {
        Self {
            search: SearchController::new(forge, action_tx),
            selected: 0,
            input_mode: false,
            input: String::new(),
            activity: FetchState::Idle,
            error: None,
            notice: None,
            should_quit: false,
            append_paused: false,
            list_rows: list_rows(terminal_height),
            initial_keyword,
        }
    }

    pub fn selected_repo(&self) -> Option<&Repository> {
        self.search.items().get(self.selected)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => match &self.initial_keyword {
                Some(keyword) => Action::Search(keyword.clone()),
                None => Action::EnterSearchMode,
            },
            Event::Tick => {
                // the sentinel row being displayed is what asks for the next page
                let sentinel = self.search.items().len();
                if self.search.has_more()
                    && !self.append_paused
                    && self.search.state() == FetchState::Idle
                    && sentinel_visible(sentinel, self.selected, self.list_rows)
                {
                    Action::LoadMore
                } else {
                    Action::None
                }
            }
            Event::Key(key) => self.handle_key(key),
            Event::Resize(w, h) => Action::Resize(w, h),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.input_mode {
            return match key.code {
                KeyCode::Esc => Action::ExitSearchMode,
                KeyCode::Enter => Action::SearchConfirm,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::SearchInput(c)
                }
                _ => Action::None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('/') | KeyCode::Char('s') => Action::EnterSearchMode,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') | KeyCode::Enter => Action::OpenInBrowser,
            KeyCode::Char('O') => Action::OpenSearchInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(
            action,
            Action::SearchCompleted(_) | Action::Resize(..) | Action::LoadMore | Action::None
        ) {
            self.error = None;
            self.notice = None;
        }

        if matches!(
            action,
            Action::ScrollUp
                | Action::ScrollDown
                | Action::PageUp
                | Action::PageDown
                | Action::GoToTop
                | Action::GoToBottom
                | Action::SearchConfirm
                | Action::Search(_)
                | Action::Refresh
        ) {
            self.append_paused = false;
        }

        let last_row = self.search.row_count().saturating_sub(1);
        let half_page = (self.list_rows / 2).max(1);

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollDown => {
                if self.selected < last_row {
                    self.selected += 1;
                }
            }
            Action::PageUp => {
                self.selected = self.selected.saturating_sub(half_page);
            }
            Action::PageDown => {
                self.selected = (self.selected + half_page).min(last_row);
            }
            Action::GoToTop => {
                self.selected = 0;
            }
            Action::GoToBottom => {
                self.selected = last_row;
            }

            Action::EnterSearchMode => {
                self.input_mode = true;
                self.input = self.search.keyword().to_string();
            }
            Action::ExitSearchMode => {
                self.input_mode = false;
            }
            Action::SearchInput(c) => {
                self.input.push(c);
            }
            Action::SearchBackspace => {
                self.input.pop();
            }
            Action::SearchConfirm => {
                self.input_mode = false;
                let keyword = self.input.clone();
                let events = self.search.set_keyword(&keyword);
                self.apply(events);
            }
            Action::Search(keyword) => {
                self.input = keyword;
                let events = self.search.set_keyword(&self.input);
                self.apply(events);
            }

            Action::Refresh => {
                let events = self.search.refresh();
                self.apply(events);
            }
            Action::LoadMore => {
                let events = self.search.fetch_next_page();
                self.apply(events);
            }
            Action::SearchCompleted(completion) => {
                let events = self.search.complete(completion);
                self.apply(events);
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.selected_repo().map(|r| r.url.clone()) {
                    self.open_url(&url);
                }
            }
            Action::OpenSearchInBrowser => {
                let keyword = self.search.keyword().trim();
                if !keyword.is_empty() {
                    let url = self.search.forge().search_url(keyword);
                    self.open_url(&url);
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_repo().map(|r| r.url.clone()) {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(format!("Clipboard: {}", e)),
                    }
                }
            }

            Action::Resize(_, height) => {
                self.list_rows = list_rows(height);
            }
            Action::None => {}
        }
    }

    fn apply(&mut self, events: Vec<SearchEvent>) {
        for event in events {
            match event {
                SearchEvent::StateChanged(state) => {
                    self.activity = state;
                }
                SearchEvent::Reloaded => {
                    self.selected = 0;
                    self.append_paused = false;
                }
                SearchEvent::RowsInserted(range) => {
                    tracing::debug!(?range, "rows inserted");
                }
                SearchEvent::Failed(err) => {
                    if matches!(err, FetchError::AppendFailed(_)) {
                        self.append_paused = true;
                    }
                    self.error = Some(err.to_string());
                }
            }
        }

        // an empty final page removes the sentinel row the selection may sit on
        self.selected = self
            .selected
            .min(self.search.row_count().saturating_sub(1));
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::warn!(url, "failed to open browser: {}", e);
            self.error = Some(format!("Could not open {}: {}", url, e));
        }
    }
}
