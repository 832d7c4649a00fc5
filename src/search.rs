//! Paginated search session.
//!
//! `SearchController` is the single gate in front of the forge: at most one
//! search or append is in flight at a time, and any request made while one is
//! outstanding is dropped rather than queued. Network calls run on spawned
//! tasks and report back as `Action::SearchCompleted` on the app's action
//! channel, so every state change happens on the loop that owns the controller.

use std::ops::Range;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::error::FetchError;
use crate::forge::Forge;
use crate::types::{Repository, ResultPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    /// First page for a keyword in flight
    Loading,
    /// Next page in flight
    Appending,
}

/// What the renderer needs to know after a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    StateChanged(FetchState),
    /// Result set replaced, redraw everything
    Reloaded,
    /// Rows appended at these indices only
    RowsInserted(Range<usize>),
    Failed(FetchError),
}

/// Outcome of a spawned forge call, delivered back to the controller.
#[derive(Debug, Clone)]
pub enum Completion {
    FirstPage(Result<ResultPage, String>),
    NextPage(Result<ResultPage, String>),
}

pub struct SearchController {
    forge: Arc<dyn Forge>,
    action_tx: mpsc::UnboundedSender<Action>,
    state: FetchState,
    keyword: String,
    results: Option<ResultPage>,
}

fn is_blank(keyword: &str) -> bool {
    keyword.trim().is_empty()
}

impl SearchController {
    pub fn new(forge: Arc<dyn Forge>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            forge,
            action_tx,
            state: FetchState::Idle,
            keyword: String::new(),
            results: None,
        }
    }

    pub fn forge(&self) -> &Arc<dyn Forge> {
        &self.forge
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn items(&self) -> &[Repository] {
        self.results
            .as_ref()
            .map(|r| r.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn total(&self) -> u64 {
        self.results.as_ref().map(|r| r.total).unwrap_or(0)
    }

    /// True while the server reports more matches than we hold.
    /// The renderer shows the sentinel row exactly while this holds.
    pub fn has_more(&self) -> bool {
        self.results.as_ref().is_some_and(ResultPage::has_more)
    }

    /// Number of list rows, including the trailing sentinel row
    pub fn row_count(&self) -> usize {
        let items = self.items().len();
        if self.has_more() {
            items + 1
        } else {
            items
        }
    }

    pub fn is_sentinel_row(&self, index: usize) -> bool {
        self.has_more() && index == self.items().len()
    }

    /// Submit a keyword. Fetches only if it is non-blank and differs from the last one.
    ///
    /// The keyword is remembered even when the fetch is dropped by the idle gate.
    pub fn set_keyword(&mut self, keyword: &str) -> Vec<SearchEvent> {
        let changed = keyword != self.keyword;
        self.keyword = keyword.to_string();

        if !changed || is_blank(keyword) {
            tracing::debug!(keyword, changed, "keyword submitted without search");
            return Vec::new();
        }
        self.fetch_first_page(keyword)
    }

    /// Re-run the search for the current keyword
    pub fn refresh(&mut self) -> Vec<SearchEvent> {
        if is_blank(&self.keyword) {
            return Vec::new();
        }
        let keyword = self.keyword.clone();
        self.fetch_first_page(&keyword)
    }

    pub fn fetch_first_page(&mut self, keyword: &str) -> Vec<SearchEvent> {
        if self.state != FetchState::Idle {
            tracing::debug!(keyword, state = ?self.state, "search busy, dropping request");
            return Vec::new();
        }
        if is_blank(keyword) {
            return Vec::new();
        }

        self.state = FetchState::Loading;
        tracing::info!(keyword, forge = self.forge.name(), "searching");

        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        let keyword = keyword.to_string();
        tokio::spawn(async move {
            let result = forge
                .search_first_page(&keyword)
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::SearchCompleted(Completion::FirstPage(result)))
                .ok();
        });

        vec![SearchEvent::StateChanged(FetchState::Loading)]
    }

    pub fn fetch_next_page(&mut self) -> Vec<SearchEvent> {
        if self.state != FetchState::Idle {
            tracing::debug!(state = ?self.state, "search busy, dropping append");
            return Vec::new();
        }
        let Some(cursor) = self.results.as_ref().and_then(|r| r.next.clone()) else {
            return Vec::new();
        };

        self.state = FetchState::Appending;
        tracing::info!(keyword = %cursor.keyword, page = cursor.page, "loading next page");

        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            let result = forge
                .search_next_page(&cursor)
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::SearchCompleted(Completion::NextPage(result)))
                .ok();
        });

        vec![SearchEvent::StateChanged(FetchState::Appending)]
    }

    /// Apply a finished forge call. Completions that don't match the call in flight are ignored.
    pub fn complete(&mut self, completion: Completion) -> Vec<SearchEvent> {
        match completion {
            Completion::FirstPage(result) => {
                if self.state != FetchState::Loading {
                    tracing::debug!(state = ?self.state, "ignoring unexpected search result");
                    return Vec::new();
                }
                self.state = FetchState::Idle;

                let mut events = vec![SearchEvent::StateChanged(FetchState::Idle)];
                match result {
                    Ok(mut page) => {
                        page.settle();
                        tracing::info!(items = page.items.len(), total = page.total, "search done");
                        self.results = Some(page);
                        events.push(SearchEvent::Reloaded);
                    }
                    Err(msg) => {
                        // previous results stay on screen
                        tracing::warn!(keyword = %self.keyword, "search failed: {}", msg);
                        events.push(SearchEvent::Failed(FetchError::FetchFailed(msg)));
                    }
                }
                events
            }
            Completion::NextPage(result) => {
                if self.state != FetchState::Appending {
                    tracing::debug!(state = ?self.state, "ignoring unexpected page");
                    return Vec::new();
                }

                let event = match (result, self.results.as_mut()) {
                    (Ok(page), Some(results)) => {
                        let range = results.merge(page);
                        tracing::info!(
                            inserted = range.len(),
                            total = results.total,
                            "appended page"
                        );
                        SearchEvent::RowsInserted(range)
                    }
                    (Ok(_), None) => SearchEvent::RowsInserted(0..0),
                    (Err(msg), _) => {
                        tracing::warn!(keyword = %self.keyword, "append failed: {}", msg);
                        SearchEvent::Failed(FetchError::AppendFailed(msg))
                    }
                };
                self.state = FetchState::Idle;

                vec![event, SearchEvent::StateChanged(FetchState::Idle)]
            }
        }
    }
}
