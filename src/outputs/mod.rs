//! Rendering of extraction results for the terminal.
//!
//! # Submodules
//!
//! - [`markdown`]: human-readable listing grouped by source
//! - [`json`]: machine-readable snapshot of records and failures
//!
//! Both renderers receive a [`CachedHeadlines`] so the fetch time is shown
//! next to the data it describes.

pub mod json;
pub mod markdown;

use crate::cache::CachedHeadlines;
use crate::cli::OutputFormat;

/// Render `cached` in the requested format.
pub fn render(format: OutputFormat, cached: &CachedHeadlines) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Markdown => Ok(markdown::render(cached)),
        OutputFormat::Json => json::render(cached),
    }
}
