//! Error types for the browser backend and the application.
//!
//! Only two things can stop a run: the browser cannot be started, or the
//! source registry file cannot be read. Everything that goes wrong while
//! scraping a single site is a [`BrowserError`] that the engine records and
//! moves past.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a browsing session.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid browser configuration: {0}")]
    Config(String),

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no element matched `{locator}` within {timeout:?}")]
    Timeout { locator: String, timeout: Duration },

    #[error("reading element failed: {0}")]
    Element(String),

    #[error("devtools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// Errors that propagate out of the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not start browsing session")]
    SessionStart(#[source] BrowserError),

    #[error("could not read source registry {path}")]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source registry")]
    RegistryYaml(#[from] serde_yaml::Error),

    #[error("invalid source `{name}`: {reason}")]
    InvalidSource { name: String, reason: String },

    #[error("source registry is empty")]
    EmptyRegistry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_timeout_message_names_locator() {
        let err = BrowserError::Timeout {
            locator: "//h2".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "no element matched `//h2` within 10s");
    }

    #[test]
    fn test_session_start_keeps_cause() {
        let err = AppError::SessionStart(BrowserError::Launch("no chrome".to_string()));
        let cause = err.source().map(|s| s.to_string());
        assert_eq!(cause.as_deref(), Some("browser launch failed: no chrome"));
    }
}
