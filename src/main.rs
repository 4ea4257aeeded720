//! # Sports Headlines
//!
//! Fetches sports headlines from Argentine news sites (Clarín, La Nación,
//! Infobae, ESPN and Olé) by loading each sports section in headless Chrome
//! and reading the elements selected by a per-site XPath rule.
//!
//! ## Usage
//!
//! ```sh
//! sports_headlines                 # fetch once, print Markdown
//! sports_headlines --interactive   # fetch on demand, cache between requests
//! ```
//!
//! ## Architecture
//!
//! 1. **Sources**: ordered list of [`sources::SourceRule`], builtin or from YAML
//! 2. **Extraction**: one browser session visits every source in turn; a site
//!    that fails is logged and skipped
//! 3. **Presentation**: results are rendered as Markdown or JSON, either once or
//!    from the interactive dashboard with its session cache
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout only carries the
//! rendered headlines.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cache;
mod cli;
mod dashboard;
mod error;
mod models;
mod outputs;
mod scrapers;
mod sources;
mod utils;

use browser::ChromeLauncher;
use cache::CachedHeadlines;
use cli::Cli;
use dashboard::Dashboard;
use sources::SourceRegistry;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("sports_headlines starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let registry = match &args.sources {
        Some(path) => SourceRegistry::load(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Could not load source registry");
        })?,
        None => SourceRegistry::builtin(),
    };
    info!(sources = registry.len(), "Source registry ready");

    let launcher = ChromeLauncher {
        user_agent: args.user_agent.clone(),
        chrome_executable: args.chrome_path.clone(),
        headless: !args.headed,
        ..ChromeLauncher::default()
    };
    let wait = Duration::from_secs(args.wait_secs);

    if args.interactive {
        let mut dashboard = Dashboard::new(&launcher, &registry, wait, args.format);
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        dashboard.run(stdin, &mut stdout).await?;
    } else {
        let result = scrapers::extract_headlines(&launcher, &registry, wait)
            .await
            .inspect_err(|e| error!(error = %e, "Extraction aborted"))?;
        let rendered = outputs::render(args.format, &CachedHeadlines::new(result))?;
        println!("{rendered}");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
