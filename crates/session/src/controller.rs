//! Search session controller.
//!
//! The controller is a synchronous state machine. Operations that may
//! change the [`FetchKey`] return the [`FetchTicket`] to run, if any; the
//! caller performs the fetch and hands the outcome back to
//! [`SearchSession::resolve`]. Time is passed in explicitly so debounce
//! behaviour does not depend on a running clock.

use crate::cache::QueryCache;
use crate::debounce::Debouncer;
use crate::fetcher::FetchResult;
use crate::key::{FetchKey, FetchTicket, TicketId};
use crate::page::ResultPage;
use crate::status::{FetchStatus, SessionView, ViewState};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Per-variant behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    pub debounce: Duration,
    /// Fetch even when the debounced term is empty
    pub allow_empty_term: bool,
    /// Keep the previous page on screen while the next one loads
    pub keep_previous_data: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            allow_empty_term: true,
            keep_previous_data: true,
        }
    }
}

impl SessionPolicy {
    /// Notes list everything for an empty term and page through it smoothly.
    pub fn notes() -> Self {
        Self::default()
    }

    /// Movie search needs a query and shows a loader between pages.
    pub fn movies() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            allow_empty_term: false,
            keep_previous_data: false,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }
}

pub struct SearchSession<R> {
    policy: SessionPolicy,
    raw_term: String,
    debounced_term: String,
    page: u32,
    /// Last page count reported by a successful fetch
    known_total_pages: u32,
    debouncer: Debouncer<String>,
    cache: QueryCache<R>,
    next_ticket: u64,
    /// Key of the most recently issued fetch
    active_key: Option<FetchKey>,
    /// Most recently issued fetch that has not resolved yet
    pending: Option<FetchTicket>,
    status: FetchStatus,
    displayed: Option<ResultPage<R>>,
}

impl<R: Clone> SearchSession<R> {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            debouncer: Debouncer::new(policy.debounce),
            policy,
            raw_term: String::new(),
            debounced_term: String::new(),
            page: 1,
            known_total_pages: 0,
            cache: QueryCache::new(),
            next_ticket: 0,
            active_key: None,
            pending: None,
            status: FetchStatus::Idle,
            displayed: None,
        }
    }

    /// Issue the initial fetch, if the policy fetches for an empty term.
    pub fn start(&mut self) -> Option<FetchTicket> {
        self.sync()
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn raw_term(&self) -> &str {
        &self.raw_term
    }

    pub fn debounced_term(&self) -> &str {
        &self.debounced_term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.known_total_pages
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    #[cfg(test)]
    fn cache(&self) -> &QueryCache<R> {
        &self.cache
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// The key that should be on screen, or `None` while idle.
    pub fn fetch_key(&self) -> Option<FetchKey> {
        if self.debounced_term.is_empty() && !self.policy().allow_empty_term {
            return None;
        }
        Some(FetchKey::new(self.debounced_term.clone(), self.page))
    }

    /// Record user input. The page always goes back to 1; the term itself
    /// only takes effect once the debounce interval passes quietly.
    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) -> Option<FetchTicket> {
        let term = term.into();
        self.raw_term.clone_from(&term);
        self.page = 1;
        self.debouncer.push(term, now);
        self.sync()
    }

    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        let last = self.known_total_pages.max(1);
        let clamped = page.clamp(1, last);
        if clamped != page {
            debug!(requested = page, clamped, "page out of range");
        }
        self.page = clamped;
        self.sync()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Commit the pending term once its quiet period has elapsed.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<FetchTicket> {
        let term = self.debouncer.poll(now)?;
        debug!(term = %term, "debounced term committed");
        if term != self.debounced_term {
            // Page count belongs to the previous term
            self.known_total_pages = 0;
        }
        self.debounced_term = term;
        self.sync()
    }

    /// Drop every cached page and refetch the current key.
    ///
    /// Call after a successful mutation of the underlying records.
    pub fn invalidate(&mut self) -> Option<FetchTicket> {
        self.cache.invalidate();
        let key = self.active_key.clone()?;
        info!(%key, "cache invalidated, refetching");
        Some(self.issue(key))
    }

    /// Apply the outcome of a fetch.
    ///
    /// Anything but the most recently issued ticket is discarded for display;
    /// successful pages are still cached if no invalidation happened since
    /// they were requested. Returns whether the display changed.
    pub fn resolve(&mut self, ticket: FetchTicket, result: FetchResult<R>) -> bool {
        if let Ok(page) = &result {
            self.cache.store(ticket.epoch, ticket.key.clone(), page.clone());
        }

        let is_latest = self.pending.as_ref().is_some_and(|p| p.id == ticket.id);
        if !is_latest {
            debug!(key = %ticket.key, id = ticket.id.0, "discarding superseded fetch result");
            return false;
        }
        self.pending = None;

        match result {
            Ok(page) => {
                self.known_total_pages = page.total_pages;
                self.status = if page.is_empty() {
                    FetchStatus::Empty
                } else {
                    FetchStatus::Success
                };
                debug!(key = %ticket.key, items = page.len(), total_pages = page.total_pages, "fetch applied");
                self.displayed = Some(page);
            }
            Err(e) => {
                warn!(key = %ticket.key, error = %e, "fetch failed");
                self.status = FetchStatus::Error(e);
                self.displayed = None;
            }
        }
        true
    }

    pub fn view(&self) -> SessionView<R> {
        let state = match &self.status {
            FetchStatus::Idle => ViewState::Idle,
            FetchStatus::Error(e) => ViewState::Error(e.clone()),
            FetchStatus::Empty => ViewState::NoResults,
            FetchStatus::Success => self.results_state(false),
            FetchStatus::Loading => self.results_state(true),
        };

        SessionView {
            raw_term: self.raw_term.clone(),
            term: self.debounced_term.clone(),
            page: self.page,
            total_pages: self.displayed.as_ref().map_or(0, |p| p.total_pages),
            fetch_key: self.active_key.clone(),
            status: self.status.clone(),
            state,
        }
    }

    fn results_state(&self, refreshing: bool) -> ViewState<R> {
        match &self.displayed {
            Some(page) if !page.is_empty() => ViewState::Results {
                page: page.clone(),
                refreshing,
            },
            Some(_) if !refreshing => ViewState::NoResults,
            _ => ViewState::Loading,
        }
    }

    /// Issue a fetch if and only if the key changed.
    fn sync(&mut self) -> Option<FetchTicket> {
        let Some(key) = self.fetch_key() else {
            if self.active_key.take().is_some() {
                debug!("search term cleared, session idle");
            }
            self.pending = None;
            self.status = FetchStatus::Idle;
            self.displayed = None;
            self.known_total_pages = 0;
            return None;
        };

        if self.active_key.as_ref() == Some(&key) {
            return None;
        }
        Some(self.issue(key))
    }

    fn issue(&mut self, key: FetchKey) -> FetchTicket {
        self.next_ticket += 1;
        let ticket = FetchTicket {
            id: TicketId(self.next_ticket),
            key: key.clone(),
            epoch: self.cache.epoch(),
        };

        if let Some(cached) = self.cache.get(&key) {
            self.displayed = Some(cached.clone());
        } else if !self.policy().keep_previous_data {
            self.displayed = None;
        }

        info!(%key, id = ticket.id.0, "issuing fetch");
        self.status = FetchStatus::Loading;
        self.active_key = Some(key);
        self.pending = Some(ticket.clone());
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i}")).collect()
    }

    fn page(n: usize, total_pages: u32) -> ResultPage<String> {
        ResultPage::new(items(n), total_pages)
    }

    fn after(now: Instant, ms: u64) -> Instant {
        now + Duration::from_millis(ms)
    }

    #[test]
    fn test_initial_state() {
        let session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        assert_eq!(session.page(), 1);
        assert_eq!(session.raw_term(), "");
        assert_eq!(session.debounced_term(), "");
        assert_eq!(session.status(), &FetchStatus::Idle);
    }

    #[test]
    fn test_notes_start_fetches_everything() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let ticket = session.start().expect("initial fetch");
        assert_eq!(ticket.key, FetchKey::new("", 1));
        assert_eq!(session.view().state, ViewState::Loading);
    }

    #[test]
    fn test_movies_empty_term_stays_idle() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());
        assert!(session.start().is_none());

        assert!(session.set_search_term("", now).is_none());
        assert!(session.poll_debounce(after(now, 500)).is_none());
        assert_eq!(session.status(), &FetchStatus::Idle);
        assert_eq!(session.view().state, ViewState::Idle);
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_term_change_waits_for_debounce() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());

        assert!(session.set_search_term("batman", now).is_none());
        assert_eq!(session.raw_term(), "batman");
        assert_eq!(session.debounced_term(), "");
        assert!(session.poll_debounce(after(now, 499)).is_none());

        let ticket = session.poll_debounce(after(now, 500)).expect("fetch");
        assert_eq!(ticket.key, FetchKey::new("batman", 1));
        assert_eq!(session.debounced_term(), "batman");
    }

    #[test]
    fn test_burst_issues_one_fetch_for_last_term() {
        let start = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());

        let mut tickets = Vec::new();
        for (i, term) in ["b", "ba", "bat", "batm", "batma", "batman"].into_iter().enumerate() {
            let now = after(start, 90 * i as u64);
            tickets.extend(session.poll_debounce(now));
            tickets.extend(session.set_search_term(term, now));
        }
        let last = after(start, 90 * 5);
        tickets.extend(session.poll_debounce(after(last, 499)));
        tickets.extend(session.poll_debounce(after(last, 500)));
        tickets.extend(session.poll_debounce(after(last, 5_000)));

        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].key, FetchKey::new("batman", 1));
    }

    #[test]
    fn test_set_search_term_resets_page() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first, Ok(page(12, 5)));

        let ticket = session.set_page(4).expect("page fetch");
        assert_eq!(ticket.key, FetchKey::new("", 4));
        assert_eq!(session.page(), 4);

        // Page reset changes the key right away; the term follows after debounce
        let reset = session.set_search_term("groceries", now).expect("reset fetch");
        assert_eq!(session.page(), 1);
        assert_eq!(reset.key, FetchKey::new("", 1));

        let committed = session.poll_debounce(after(now, 500)).expect("term fetch");
        assert_eq!(committed.key, FetchKey::new("groceries", 1));
    }

    #[test]
    fn test_set_page_clamps() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first, Ok(page(12, 3)));

        assert_eq!(session.set_page(10).map(|t| t.key.page), Some(3));
        assert_eq!(session.set_page(0).map(|t| t.key.page), Some(1));
        assert!(session.prev_page().is_none());
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_same_key_is_not_refetched() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first, Ok(page(12, 3)));

        assert!(session.set_page(1).is_none());
        assert!(session.set_page(2).is_some());
        assert!(session.set_page(2).is_none());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());
        session.set_search_term("alien", now);
        let a = session.poll_debounce(after(now, 500)).expect("A");

        let later = after(now, 600);
        session.set_search_term("aliens", later);
        let b = session.poll_debounce(after(later, 500)).expect("B");

        assert!(session.resolve(b.clone(), Ok(page(3, 1))));
        assert!(!session.resolve(a.clone(), Ok(page(20, 7))));

        match session.view().state {
            ViewState::Results { page, refreshing } => {
                assert_eq!(page.len(), 3);
                assert!(!refreshing);
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(session.total_pages(), 1);
        assert_eq!(session.view().fetch_key, Some(b.key));
    }

    #[test]
    fn test_superseded_error_is_discarded() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let a = session.start().expect("A");
        session.resolve(a, Ok(page(12, 3)));
        let b = session.set_page(2).expect("B");
        let c = session.set_page(3).expect("C");

        assert!(!session.resolve(b, Err(FetchError::Status { status: 500 })));
        assert_eq!(session.status(), &FetchStatus::Loading);
        assert!(session.resolve(c, Ok(page(4, 3))));
        assert_eq!(session.status(), &FetchStatus::Success);
    }

    #[test]
    fn test_empty_success_is_not_an_error() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let ticket = session.start().expect("initial");
        session.resolve(ticket, Ok(page(0, 0)));

        assert_eq!(session.status(), &FetchStatus::Empty);
        assert_eq!(session.view().state, ViewState::NoResults);
        assert!(!session.view().shows_pager());
    }

    #[test]
    fn test_error_state() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let ticket = session.start().expect("initial");
        let error = FetchError::Network("connection refused".into());
        session.resolve(ticket, Err(error.clone()));

        assert_eq!(session.view().state, ViewState::Error(error));
    }

    #[test]
    fn test_keep_previous_data_while_loading() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first, Ok(page(12, 3)));

        session.set_page(3).expect("page 3");
        match session.view().state {
            ViewState::Results { page, refreshing } => {
                assert_eq!(page.len(), 12);
                assert!(refreshing);
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(session.view().shows_pager());
    }

    #[test]
    fn test_loader_without_previous_data() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());
        session.set_search_term("batman", now);
        let first = session.poll_debounce(after(now, 500)).expect("page 1");
        session.resolve(first, Ok(page(20, 3)));

        session.set_page(2).expect("page 2");
        assert_eq!(session.view().state, ViewState::Loading);
        assert_eq!(session.view().total_pages, 0);
    }

    #[test]
    fn test_cached_page_shown_immediately() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies().with_debounce(Duration::ZERO));
        let now = Instant::now();
        session.set_search_term("batman", now);
        let p1 = session.poll_debounce(now).expect("page 1");
        session.resolve(p1, Ok(page(20, 3)));
        let p2 = session.set_page(2).expect("page 2");
        session.resolve(p2, Ok(page(20, 3)));

        // Back to page 1: cached copy is shown while the refetch runs
        let again = session.set_page(1).expect("refetch page 1");
        assert_eq!(again.key, FetchKey::new("batman", 1));
        assert!(matches!(
            session.view().state,
            ViewState::Results { refreshing: true, .. }
        ));
    }

    #[test]
    fn test_invalidate_refetches_current_key() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first.clone(), Ok(page(5, 1)));
        assert_eq!(session.cache().len(), 1);

        let refetch = session.invalidate().expect("refetch");
        assert_eq!(refetch.key, first.key);
        assert_ne!(refetch.id, first.id);
        assert!(session.cache().is_empty());

        session.resolve(refetch, Ok(page(4, 1)));
        assert_eq!(session.view().items().len(), 4);
    }

    #[test]
    fn test_invalidate_while_idle_is_noop() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());
        assert!(session.invalidate().is_none());
    }

    #[test]
    fn test_pre_invalidation_result_not_cached() {
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let before = session.start().expect("initial");
        let after_mutation = session.invalidate().expect("refetch");

        assert!(!session.resolve(before, Ok(page(5, 1))));
        assert!(session.cache().is_empty());
        assert!(session.resolve(after_mutation, Ok(page(4, 1))));
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_clearing_term_returns_to_idle() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());
        session.set_search_term("batman", now);
        let ticket = session.poll_debounce(after(now, 500)).expect("fetch");
        session.resolve(ticket.clone(), Ok(page(20, 3)));

        let later = after(now, 1_000);
        session.set_search_term("", later);
        assert!(session.poll_debounce(after(later, 500)).is_none());
        assert_eq!(session.view().state, ViewState::Idle);

        // Late answers for the abandoned key change nothing
        assert!(!session.resolve(ticket, Ok(page(1, 1))));
        assert_eq!(session.view().state, ViewState::Idle);
    }

    #[test]
    fn test_new_term_forgets_previous_page_count() {
        let now = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::notes());
        let first = session.start().expect("initial");
        session.resolve(first, Ok(page(12, 5)));
        assert_eq!(session.total_pages(), 5);

        session.set_search_term("milk", now);
        let committed = session.poll_debounce(after(now, 500)).expect("term fetch");
        assert_eq!(session.total_pages(), 0);

        // Nothing known about "milk" yet, so page 4 clamps to 1
        assert!(session.set_page(4).is_none());
        assert_eq!(session.page(), 1);

        session.resolve(committed, Ok(page(12, 2)));
        assert_eq!(session.set_page(4).map(|t| t.key), Some(FetchKey::new("milk", 2)));
    }

    #[test]
    fn test_cache_stays_bounded_over_many_searches() {
        let start = Instant::now();
        let mut session: SearchSession<String> = SearchSession::new(SessionPolicy::movies());

        for i in 0..1000u64 {
            let now = after(start, i * 1_000);
            session.set_search_term(format!("term {i}"), now);
            let ticket = session.poll_debounce(after(now, 500)).expect("fetch");
            assert!(session.resolve(ticket, Ok(page(20, 3))));
        }

        assert_eq!(session.cache().len(), crate::cache::DEFAULT_CACHE_CAPACITY);
    }
}
