use crate::fetcher::FetchError;
use crate::key::FetchKey;
use crate::page::ResultPage;
use std::fmt;

/// Lifecycle of the fetch for the current key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// No search performed; only reachable when empty terms are not fetched
    #[default]
    Idle,
    Loading,
    Success,
    /// Succeeded with zero items
    Empty,
    Error(FetchError),
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "Idle"),
            FetchStatus::Loading => write!(f, "Loading"),
            FetchStatus::Success => write!(f, "Success"),
            FetchStatus::Empty => write!(f, "No results"),
            FetchStatus::Error(e) => write!(f, "Error ({e})"),
        }
    }
}

/// What a renderer should draw right now.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<R> {
    Idle,
    /// Nothing to show yet
    Loading,
    Results {
        page: ResultPage<R>,
        /// A fetch for a newer key is in flight and `page` is a placeholder
        refreshing: bool,
    },
    NoResults,
    Error(FetchError),
}

/// Snapshot of a session, published after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<R> {
    pub raw_term: String,
    pub term: String,
    pub page: u32,
    pub total_pages: u32,
    pub fetch_key: Option<FetchKey>,
    pub status: FetchStatus,
    pub state: ViewState<R>,
}

impl<R> Default for SessionView<R> {
    fn default() -> Self {
        Self {
            raw_term: String::new(),
            term: String::new(),
            page: 1,
            total_pages: 0,
            fetch_key: None,
            status: FetchStatus::Idle,
            state: ViewState::Idle,
        }
    }
}

impl<R> SessionView<R> {
    /// Items currently on screen, fresh or placeholder.
    pub fn items(&self) -> &[R] {
        match &self.state {
            ViewState::Results { page, .. } => &page.items,
            _ => &[],
        }
    }

    pub fn shows_pager(&self) -> bool {
        self.total_pages > 1
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self.status, FetchStatus::Loading)
    }
}
