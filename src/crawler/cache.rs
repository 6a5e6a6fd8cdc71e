//! Page cache for extracted links
//!
//! Maps a fetched URL string to the links extracted from it. Entries are
//! never evicted; they live as long as the cache itself (the server keeps one
//! for its whole lifetime). Two workers may race to fetch the same URL before
//! either has cached it; once an entry exists, lookups never refetch.

use crate::crawler::Link;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct PageCache {
    entries: RwLock<HashMap<String, Arc<[Link]>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached links for `url`, if any
    pub fn get(&self, url: &str) -> Option<Arc<[Link]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Stores the links for `url`, replacing any earlier entry
    pub fn put(&self, url: impl Into<String>, links: Arc<[Link]>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), links);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
