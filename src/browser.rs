//! Browsing session backend.
//!
//! The extraction engine only needs four things from a browser: open a page,
//! wait for elements matching a locator, read text or attributes from those
//! elements, and shut down. Those needs are the [`SessionLauncher`],
//! [`BrowsingSession`] and [`PageElement`] traits.
//!
//! [`ChromeLauncher`] is the production implementation: a headless Chrome
//! driven over the DevTools protocol with `chromiumoxide`.

use crate::error::BrowserError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout, timeout_at};
use tracing::{debug, info, instrument, warn};

/// Identity sent to the news sites unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// How often a pending locator is re-evaluated while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long a closing browser gets to exit before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Starts a browsing session.
#[allow(async_fn_in_trait)]
pub trait SessionLauncher {
    type Session: BrowsingSession;

    async fn launch(&self) -> Result<Self::Session, BrowserError>;
}

/// One exclusively owned browser tab, reused across sites.
#[allow(async_fn_in_trait)]
pub trait BrowsingSession {
    type Element: PageElement;

    /// Load `url` in the session.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Wait until at least one element matches `locator`, then return every
    /// match in document order. Fails with [`BrowserError::Timeout`] when
    /// nothing matched before `wait`.
    async fn wait_for_elements(
        &mut self,
        locator: &str,
        wait: Duration,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    /// Release the session.
    async fn close(self) -> Result<(), BrowserError>;
}

/// An element handle on a loaded page.
#[allow(async_fn_in_trait)]
pub trait PageElement {
    /// Rendered text of the element.
    async fn text(&self) -> Result<String, BrowserError>;

    /// Value of the named attribute, `None` when absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError>;
}

/// Launch settings for headless Chrome.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    pub user_agent: String,
    pub chrome_executable: Option<PathBuf>,
    pub headless: bool,
    pub request_timeout: Duration,
}

impl Default for ChromeLauncher {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_executable: None,
            headless: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ChromeLauncher {
    fn config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent));

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if !self.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(BrowserError::Config)
    }
}

impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    #[instrument(level = "info", skip_all, fields(headless = self.headless))]
    async fn launch(&self) -> Result<ChromeSession, BrowserError> {
        let config = self.config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler must be polled for any CDP command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        info!(user_agent = %self.user_agent, "Browser session started");
        Ok(ChromeSession {
            browser,
            page,
            handler_task,
            request_timeout: self.request_timeout,
        })
    }
}

/// A live Chrome process with a single tab.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    request_timeout: Duration,
}

impl BrowsingSession for ChromeSession {
    type Element = ChromeElement;

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let navigation_error = |reason: String| BrowserError::Navigation {
            url: url.to_string(),
            reason,
        };
        match timeout(self.request_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(navigation_error(e.to_string())),
            Err(_) => Err(navigation_error(format!(
                "page did not load within {:?}",
                self.request_timeout
            ))),
        }
    }

    async fn wait_for_elements(
        &mut self,
        locator: &str,
        wait: Duration,
    ) -> Result<Vec<ChromeElement>, BrowserError> {
        let page = &self.page;
        let found = poll_until_found(locator, wait, || page.find_xpaths(locator)).await?;
        Ok(found.into_iter().map(ChromeElement).collect())
    }

    async fn close(mut self) -> Result<(), BrowserError> {
        let result = shut_down(&mut self.browser, EXIT_GRACE).await;
        self.handler_task.abort();
        if result.is_ok() {
            info!("Browser session closed");
        }
        result
    }
}

/// Re-run `lookup` until it yields at least one match or `wait` elapses.
///
/// Each lookup is cut off at the deadline, and the pause between lookups never
/// runs past it. Lookup errors count as "not yet".
async fn poll_until_found<T, E, F, Fut>(
    locator: &str,
    wait: Duration,
    mut lookup: F,
) -> Result<Vec<T>, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: fmt::Display,
{
    let deadline = Instant::now() + wait;
    loop {
        match timeout_at(deadline, lookup()).await {
            Ok(Ok(found)) if !found.is_empty() => return Ok(found),
            Ok(Ok(_)) => {}
            // The document may still be replacing itself; keep polling.
            Ok(Err(e)) => debug!(error = %e, locator, "Locator evaluation failed"),
            Err(_) => break,
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        sleep(POLL_INTERVAL.min(remaining)).await;
    }
    Err(BrowserError::Timeout {
        locator: locator.to_string(),
        timeout: wait,
    })
}

/// The process-level controls needed to shut a browser down.
#[allow(async_fn_in_trait)]
trait BrowserProcess {
    /// Ask the browser to close itself.
    async fn request_close(&mut self) -> Result<(), BrowserError>;

    async fn force_kill(&mut self);

    async fn wait_exit(&mut self) -> Result<(), BrowserError>;
}

impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), BrowserError> {
        self.close().await?;
        Ok(())
    }

    async fn force_kill(&mut self) {
        if let Some(Err(e)) = self.kill().await {
            warn!(error = %e, "Killing browser process failed");
        }
    }

    async fn wait_exit(&mut self) -> Result<(), BrowserError> {
        self.wait()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Launch(e.to_string()))
    }
}

/// Close `process`, killing it when the close request fails or the process is
/// still alive after `grace`. Never waits longer than `grace` for the exit.
async fn shut_down<P: BrowserProcess>(process: &mut P, grace: Duration) -> Result<(), BrowserError> {
    let closed = process.request_close().await;
    if let Err(e) = &closed {
        warn!(error = %e, "Close request failed; killing browser");
        process.force_kill().await;
    }
    match timeout(grace, process.wait_exit()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Waiting for browser exit failed"),
        Err(_) => {
            warn!(?grace, "Browser did not exit; killing");
            process.force_kill().await;
        }
    }
    closed
}

/// Element handle backed by a CDP remote object.
pub struct ChromeElement(Element);

impl PageElement for ChromeElement {
    async fn text(&self) -> Result<String, BrowserError> {
        let text = self
            .0
            .inner_text()
            .await
            .map_err(|e| BrowserError::Element(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| BrowserError::Element(e.to_string()))
    }
}
