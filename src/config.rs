use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, ScrapeError};
use crate::query_builder::{Locale, SearchQuery};

pub const API_KEY_ENV: &str = "SCRAPERAPI_KEY";

/// Scrape supplier data using ScraperAPI + Google search
#[derive(Debug, Clone, Parser)]
#[command(name = "supplier-scraper", version, about)]
pub struct Cli {
    /// ScraperAPI key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Google search query for supplier discovery
    #[arg(long, default_value = "China chemical suppliers list")]
    pub query: String,

    #[arg(long, default_value = "China")]
    pub country: String,

    #[arg(long, default_value = "Asia")]
    pub region: String,

    /// Two-letter code the proxy uses to geo-route requests
    #[arg(long, default_value = "cn")]
    pub country_code: String,

    /// Maximum number of search results to fetch
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub num_results: u32,

    /// Seconds to wait between page fetches
    #[arg(long, default_value_t = 1.5)]
    pub delay: f64,

    /// Output path for the JSON array, or `-` for stdout
    #[arg(long, default_value = "suppliers.json")]
    pub output: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "-" => OutputTarget::Stdout,
            path => OutputTarget::File(PathBuf::from(path)),
        }
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "stdout"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api_key: String,
    pub query: SearchQuery,
    pub delay: Duration,
    pub output: OutputTarget,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let api_key = cli
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ScrapeError::MissingApiKey(API_KEY_ENV))?;

        // Rejects negative, NaN and values too large for a Duration.
        let delay = Duration::try_from_secs_f64(cli.delay).map_err(|e| {
            ScrapeError::InvalidConfig(format!(
                "--delay must be a non-negative number of seconds, got {}: {}",
                cli.delay, e
            ))
        })?;

        let locale = Locale {
            country: cli.country.trim().to_string(),
            region: cli.region.trim().to_string(),
            country_code: cli.country_code.trim().to_lowercase(),
        };
        let query = SearchQuery::build(&cli.query, locale, cli.num_results as usize)?;

        Ok(RunConfig {
            api_key,
            query,
            delay,
            output: OutputTarget::parse(&cli.output),
        })
    }
}
