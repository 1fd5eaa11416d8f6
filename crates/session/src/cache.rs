//! Keyed result store with explicit invalidation.
//!
//! The store holds at most `capacity` pages. Storing past that evicts the
//! page that was stored longest ago, so a long session that visits many
//! terms keeps only its recent keys.

use crate::key::FetchKey;
use crate::page::ResultPage;
use std::collections::{HashMap, VecDeque};

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

pub struct QueryCache<R> {
    entries: HashMap<FetchKey, ResultPage<R>>,
    /// Keys in store order, oldest first
    order: VecDeque<FetchKey>,
    capacity: usize,
    /// Bumped on every invalidation
    epoch: u64,
}

impl<R> Default for QueryCache<R> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl<R> QueryCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn get(&self, key: &FetchKey) -> Option<&ResultPage<R>> {
        self.entries.get(key)
    }

    /// Store a page fetched during `epoch`.
    ///
    /// Returns `false` and drops the page when the cache has been
    /// invalidated since the fetch was issued.
    pub fn store(&mut self, epoch: u64, key: FetchKey, page: ResultPage<R>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        if self.entries.insert(key.clone(), page).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        true
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.epoch += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
