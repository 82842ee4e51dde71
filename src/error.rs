use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Missing ScraperAPI key. Set {0} or pass --api-key.")]
    MissingApiKey(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Proxy returned status {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to serialize records: {0}")]
    Serialize(String),

    #[error("Failed to write output {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Configuration problems are caught before any request goes out.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingApiKey(_) | ScrapeError::InvalidConfig(_)
        )
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the proxy api_key.
        ScrapeError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Serialize(err.to_string())
    }
}
