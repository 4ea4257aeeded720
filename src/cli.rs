//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable, so the
//! tool can be configured once in a shell profile.

use crate::browser::DEFAULT_USER_AGENT;
use crate::scrapers::DEFAULT_WAIT;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Fetch sports headlines from Argentine news sites.
///
/// # Examples
///
/// ```sh
/// # Fetch once and print Markdown
/// sports_headlines
///
/// # Interactive dashboard with a custom registry
/// sports_headlines --interactive --sources ./sources.yaml
///
/// # JSON output, longer wait for slow sites
/// sports_headlines --format json --wait-secs 20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file replacing the builtin list of sites
    #[arg(short, long, env = "HEADLINES_SOURCES")]
    pub sources: Option<PathBuf>,

    /// User-agent the browser identifies itself with
    #[arg(long, env = "HEADLINES_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds to wait for each site's headlines to appear
    #[arg(short, long, default_value_t = DEFAULT_WAIT.as_secs())]
    pub wait_secs: u64,

    /// Path to the Chrome or Chromium executable
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Keep running and fetch on demand instead of exiting after one fetch
    #[arg(short, long)]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["sports_headlines"]);

        assert_eq!(cli.wait_secs, 10);
        assert_eq!(cli.format, OutputFormat::Markdown);
        assert!(!cli.headed);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "sports_headlines",
            "-s",
            "/tmp/sources.yaml",
            "-w",
            "20",
            "-f",
            "json",
            "-i",
        ]);

        assert_eq!(cli.sources, Some(PathBuf::from("/tmp/sources.yaml")));
        assert_eq!(cli.wait_secs, 20);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.interactive);
    }

    #[test]
    fn test_cli_user_agent_override() {
        let cli = Cli::parse_from(["sports_headlines", "--user-agent", "TestBot/1.0", "--headed"]);

        assert_eq!(cli.user_agent, "TestBot/1.0");
        assert!(cli.headed);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["sports_headlines", "--format", "csv"]).is_err());
    }
}
