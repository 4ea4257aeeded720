//! Headline extraction.
//!
//! One batch walks the [`SourceRegistry`](crate::sources::SourceRegistry) in
//! order with a single browsing session:
//!
//! 1. **Load** the site's page
//! 2. **Locate** headline elements, waiting up to the configured timeout
//! 3. **Read** each element into a [`HeadlineRecord`](crate::models::HeadlineRecord)
//!
//! A site that fails at any step is recorded as a
//! [`SiteFailure`](crate::models::SiteFailure) and contributes no records.
//! The batch always moves on to the next site, and the session is closed once
//! all sites have been visited.

pub mod headlines;

pub use headlines::{DEFAULT_WAIT, extract_headlines};
