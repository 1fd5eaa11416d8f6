//! Paged search session core.
//!
//! A [`SearchSession`] owns the raw search term, its debounced value and the
//! current page. Together the debounced term and the page form a
//! [`FetchKey`]; every change of that key issues exactly one fetch, and only
//! the most recently issued fetch may update what is displayed.
//!
//! [`spawn_session`] runs a session on a tokio task and talks to it through a
//! [`SessionHandle`].

pub mod cache;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod fetcher;
pub mod key;
pub mod page;
pub mod pager;
pub mod status;

pub use cache::{DEFAULT_CACHE_CAPACITY, QueryCache};
pub use controller::{DEFAULT_DEBOUNCE, SearchSession, SessionPolicy};
pub use debounce::Debouncer;
pub use driver::{SessionClosed, SessionEvent, SessionHandle, spawn_session};
pub use fetcher::{FetchError, FetchResult, Fetcher};
pub use key::{FetchKey, FetchTicket, TicketId};
pub use page::ResultPage;
pub use pager::{PagerItem, pager_items};
pub use status::{FetchStatus, SessionView, ViewState};
