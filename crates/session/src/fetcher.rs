use crate::key::FetchKey;
use crate::page::ResultPage;

/// Why a fetch produced no page.
///
/// Stored in session state and cloned into views, so it carries only owned
/// strings rather than the transport's error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Generic text for end users; details go to the log.
    pub fn user_message(&self) -> &'static str {
        "There was an error, please try again..."
    }
}

pub type FetchResult<R> = Result<ResultPage<R>, FetchError>;

/// Produces a page of records for a key.
///
/// Implementations must be safe to call repeatedly and to abandon: the
/// session may ignore the outcome of any call.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync + 'static {
    type Record: Clone + Send + Sync + 'static;

    async fn fetch(&self, key: &FetchKey) -> FetchResult<Self::Record>;
}
