//! Interactive terminal dashboard.
//!
//! Reads one command per line and fetches only when asked. The last result is
//! kept in a [`HeadlineCache`] and shown again until the user requests a
//! refresh.
//!
//! | Command | Effect |
//! |---------|--------|
//! | *(empty)*, `f`, `fetch` | Show headlines, fetching if nothing is cached |
//! | `r`, `refresh` | Drop the cached result and fetch again |
//! | `h`, `help` | List commands |
//! | `q`, `quit` | Exit |

use crate::browser::SessionLauncher;
use crate::cache::HeadlineCache;
use crate::cli::OutputFormat;
use crate::outputs;
use crate::scrapers::extract_headlines;
use crate::sources::SourceRegistry;
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

const HELP: &str = "Comandos: [Enter]/f = obtener titulares, r = actualizar, h = ayuda, q = salir\n";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "f" | "fetch" => Command::Show,
            "r" | "refresh" => Command::Refresh,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub struct Dashboard<'a, L> {
    launcher: &'a L,
    registry: &'a SourceRegistry,
    wait: Duration,
    format: OutputFormat,
    cache: HeadlineCache,
}

impl<'a, L: SessionLauncher> Dashboard<'a, L> {
    pub fn new(
        launcher: &'a L,
        registry: &'a SourceRegistry,
        wait: Duration,
        format: OutputFormat,
    ) -> Self {
        Self {
            launcher,
            registry,
            wait,
            format,
            cache: HeadlineCache::new(),
        }
    }

    /// Serve commands from `input` until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<(), Box<dyn Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output.write_all(HELP.as_bytes()).await?;
        output.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = Command::parse(&line);
            debug!(?command, "Dashboard command");
            match command {
                Command::Show => self.show(output).await?,
                Command::Refresh => {
                    self.cache.invalidate();
                    self.show(output).await?;
                }
                Command::Help => output.write_all(HELP.as_bytes()).await?,
                Command::Quit => break,
                Command::Unknown(other) => {
                    let msg = format!("Comando desconocido: {other}\n{HELP}");
                    output.write_all(msg.as_bytes()).await?;
                }
            }
            output.flush().await?;
        }

        info!("Dashboard closed");
        Ok(())
    }

    async fn show<W: AsyncWrite + Unpin>(&mut self, output: &mut W) -> Result<(), Box<dyn Error>> {
        let (launcher, registry, wait) = (self.launcher, self.registry, self.wait);

        if self.cache.get().is_none() {
            output.write_all(b"Scrapeando titulares...\n").await?;
            output.flush().await?;
        }

        let fetched = self
            .cache
            .get_or_try_fetch(|| extract_headlines(launcher, registry, wait))
            .await;
        match fetched {
            Ok(cached) => {
                let rendered = outputs::render(self.format, cached)?;
                output.write_all(rendered.as_bytes()).await?;
            }
            Err(e) => {
                // Keep the dashboard alive so the user can retry.
                error!(error = %e, "Fetch failed");
                let msg = format!("Error: {e}\n");
                output.write_all(msg.as_bytes()).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{FakeElement, FakeLauncher, FakePage};
    use crate::outputs::markdown::NOTHING_FOUND;
    use crate::sources::{HeadlineMode, SourceRule};

    fn registry() -> SourceRegistry {
        SourceRegistry::new(vec![SourceRule {
            name: "Test".to_string(),
            page_url: "https://test.example/".to_string(),
            locator: "//h2".to_string(),
            headline_mode: HeadlineMode::ReadText,
            link_attr: None,
            base_url: None,
        }])
    }

    fn launcher() -> FakeLauncher {
        FakeLauncher::new(vec![(
            "https://test.example/",
            FakePage::Elements(vec![FakeElement::text("Boca campeón")]),
        )])
    }

    async fn run_script(launcher: &FakeLauncher, script: &str) -> String {
        let registry = registry();
        let mut dashboard = Dashboard::new(
            launcher,
            &registry,
            Duration::from_millis(10),
            OutputFormat::Markdown,
        );
        let mut output = Vec::new();
        dashboard.run(script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse(""), Command::Show);
        assert_eq!(Command::parse(" F "), Command::Show);
        assert_eq!(Command::parse("refresh"), Command::Refresh);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("zz"), Command::Unknown("zz".to_string()));
    }

    #[tokio::test]
    async fn test_repeated_show_uses_cache() {
        let launcher = launcher();
        let out = run_script(&launcher, "f\n\nf\nq\n").await;

        assert_eq!(launcher.launches(), 1);
        assert_eq!(out.matches("**Titular:** Boca campeón").count(), 3);
        assert_eq!(out.matches("Scrapeando titulares...").count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_refetches() {
        let launcher = launcher();
        run_script(&launcher, "f\nr\nf\nq\n").await;

        assert_eq!(launcher.launches(), 2);
        assert_eq!(launcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_no_fetch_without_request() {
        let launcher = launcher();
        let out = run_script(&launcher, "h\nq\nf\n").await;

        assert_eq!(launcher.launches(), 0);
        assert!(!out.contains("Titular"));
    }

    #[tokio::test]
    async fn test_empty_result_shows_notice() {
        let launcher = FakeLauncher::new(vec![("https://test.example/", FakePage::Unreachable)]);
        let out = run_script(&launcher, "f\n").await;

        assert!(out.contains(NOTHING_FOUND));
        assert!(out.contains("- **Test**:"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported_and_retried() {
        let launcher = FakeLauncher {
            fail_launch: true,
            ..launcher()
        };
        let out = run_script(&launcher, "f\nf\nq\n").await;

        assert_eq!(out.matches("Error: could not start browsing session").count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let launcher = launcher();
        let out = run_script(&launcher, "xyz\n").await;
        assert!(out.contains("Comando desconocido: xyz"));
    }
}
