use std::fmt;

/// The pair that decides which result set should be on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub term: String,
    /// 1-based page number
    pub page: u32,
}

impl FetchKey {
    pub fn new(term: impl Into<String>, page: u32) -> Self {
        Self {
            term: term.into(),
            page,
        }
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.term, self.page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(pub u64);

/// One issued fetch.
///
/// `epoch` is the cache epoch at issue time; results from an older epoch
/// are never written back into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: TicketId,
    pub key: FetchKey,
    pub epoch: u64,
}
