//! JSON snapshot of a fetch.
//!
//! ```json
//! {
//!   "fetched_at": "2026-10-18T12:30:00-03:00",
//!   "records": [{ "source": "ESPN", "headline": "...", "url": "" }],
//!   "failures": [{ "source": "Ole", "reason": "..." }]
//! }
//! ```

use crate::cache::CachedHeadlines;
use crate::models::{HeadlineRecord, SiteFailure};
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    fetched_at: &'a DateTime<Local>,
    records: &'a [HeadlineRecord],
    failures: &'a [SiteFailure],
}

pub fn render(cached: &CachedHeadlines) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Snapshot {
        fetched_at: &cached.fetched_at,
        records: &cached.result.records,
        failures: &cached.result.failures,
    })
}
