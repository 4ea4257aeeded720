//! Session cache for the last extraction.
//!
//! The engine never memoizes. The dashboard owns one [`HeadlineCache`] and
//! decides when to reuse or drop it. There is no expiry: an entry lives until
//! the user asks for a refresh.

use crate::models::ExtractionResult;
use chrono::{DateTime, Local};
use std::future::Future;
use tracing::debug;

/// An extraction result and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedHeadlines {
    pub result: ExtractionResult,
    pub fetched_at: DateTime<Local>,
}

impl CachedHeadlines {
    pub fn new(result: ExtractionResult) -> Self {
        Self {
            result,
            fetched_at: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlineCache {
    entry: Option<CachedHeadlines>,
}

impl HeadlineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&CachedHeadlines> {
        self.entry.as_ref()
    }

    pub fn store(&mut self, result: ExtractionResult) -> &CachedHeadlines {
        self.entry.insert(CachedHeadlines::new(result))
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Headline cache invalidated");
        }
    }

    /// Return the cached entry, running `fetch` only when there is none.
    ///
    /// A failed fetch leaves the cache empty.
    pub async fn get_or_try_fetch<F, Fut, E>(&mut self, fetch: F) -> Result<&CachedHeadlines, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ExtractionResult, E>>,
    {
        match self.entry {
            Some(ref entry) => Ok(entry),
            None => {
                let result = fetch().await?;
                Ok(self.store(result))
            }
        }
    }
}
