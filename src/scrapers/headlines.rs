//! The per-site extraction engine.

use crate::browser::{BrowsingSession, PageElement, SessionLauncher};
use crate::error::{AppError, BrowserError};
use crate::models::{ExtractionResult, HeadlineRecord, SiteFailure};
use crate::sources::{HeadlineMode, SourceRegistry, SourceRule};
use crate::utils::truncate_for_log;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How long to wait for a site's locator to match anything.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

/// Run one batch over every source in `registry`.
///
/// Failing to launch the browser is the only error. Unreachable sites,
/// locators that never match, and unreadable elements end up in
/// [`ExtractionResult::failures`]. If every site fails the result is simply
/// empty.
///
/// The session is closed exactly once before returning.
#[instrument(level = "info", skip_all, fields(sources = registry.len(), wait = ?wait))]
pub async fn extract_headlines<L: SessionLauncher>(
    launcher: &L,
    registry: &SourceRegistry,
    wait: Duration,
) -> Result<ExtractionResult, AppError> {
    let mut session = launcher.launch().await.map_err(AppError::SessionStart)?;
    let mut result = ExtractionResult::default();

    for rule in registry {
        info!(source = %rule.name, url = %rule.page_url, "Scraping source");
        match extract_site(&mut session, rule, wait).await {
            Ok(records) => {
                info!(source = %rule.name, count = records.len(), "Extracted headlines");
                result.records.extend(records);
            }
            Err(e) => {
                warn!(source = %rule.name, error = %e, "Source skipped");
                result.failures.push(SiteFailure {
                    source: rule.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if let Err(e) = session.close().await {
        warn!(error = %e, "Closing browsing session failed");
    }

    info!(
        records = result.records.len(),
        failed_sources = result.failures.len(),
        "Extraction complete"
    );
    Ok(result)
}

/// Load one site and turn every matching element into a record.
async fn extract_site<S: BrowsingSession>(
    session: &mut S,
    rule: &SourceRule,
    wait: Duration,
) -> Result<Vec<HeadlineRecord>, BrowserError> {
    session.navigate(&rule.page_url).await?;
    let elements = session.wait_for_elements(&rule.locator, wait).await?;
    debug!(source = %rule.name, matched = elements.len(), "Locator matched");

    let mut records = Vec::with_capacity(elements.len());
    for element in &elements {
        if let Some(record) = read_record(rule, element).await? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Build a record from one element, or `None` when its headline is blank.
async fn read_record<E: PageElement>(
    rule: &SourceRule,
    element: &E,
) -> Result<Option<HeadlineRecord>, BrowserError> {
    let raw = match &rule.headline_mode {
        HeadlineMode::ReadText => element.text().await?,
        HeadlineMode::ReadAttribute(attr) => element.attribute(attr).await?.unwrap_or_default(),
    };
    let headline = raw.trim();
    if headline.is_empty() {
        debug!(source = %rule.name, "Skipping element with blank headline");
        return Ok(None);
    }

    let url = match &rule.link_attr {
        Some(attr) => {
            let raw_link = element.attribute(attr).await?;
            resolve_link(raw_link.as_deref(), rule.base_url.as_deref())
        }
        None => String::new(),
    };

    debug!(source = %rule.name, headline = %truncate_for_log(headline, 80), %url, "Headline");
    Ok(Some(HeadlineRecord {
        source: rule.name.clone(),
        headline: headline.to_string(),
        url,
    }))
}

/// Turn a raw link attribute into the URL to present.
///
/// Root-relative paths are prefixed with `base_url` when one is set. Anything
/// else, including absolute URLs, is returned unchanged. A missing attribute
/// yields an empty string.
pub fn resolve_link(raw: Option<&str>, base_url: Option<&str>) -> String {
    match (raw, base_url) {
        (Some(link), Some(base)) if link.starts_with('/') && !base.is_empty() => {
            format!("{base}{link}")
        }
        (Some(link), _) => link.to_string(),
        (None, _) => String::new(),
    }
}
