//! Data models for scraped headlines.
//!
//! - [`HeadlineRecord`]: one headline found on one site
//! - [`SiteFailure`]: a site that contributed nothing, and why
//! - [`ExtractionResult`]: everything one batch produced, in registry order

use serde::{Deserialize, Serialize};

/// A single headline extracted from a page element.
///
/// `headline` is never empty and carries no surrounding whitespace. An empty
/// `url` means the site rule does not read links, or the element had none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlineRecord {
    /// Name of the site rule that produced this record.
    pub source: String,
    /// Trimmed headline text.
    pub headline: String,
    /// Absolute or raw link, possibly empty.
    pub url: String,
}

impl HeadlineRecord {
    /// Whether the record carries a link worth rendering.
    pub fn has_link(&self) -> bool {
        !self.url.is_empty()
    }
}

/// A site that was skipped during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteFailure {
    pub source: String,
    pub reason: String,
}

/// Outcome of one pass over every configured source.
///
/// Records follow registry order, then document order within each page.
/// Duplicates are kept as found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionResult {
    pub records: Vec<HeadlineRecord>,
    pub failures: Vec<SiteFailure>,
}

impl ExtractionResult {
    /// True when no site produced a headline. This is a normal outcome.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
