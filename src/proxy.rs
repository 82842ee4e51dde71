use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use log::debug;
use url::Url;
use rand::seq::SliceRandom;

use crate::error::{Result, ScrapeError};

const SCRAPERAPI_ENDPOINT: &str = "https://api.scraperapi.com/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Anything that can turn a URL into page HTML.
pub trait PageFetcher {
    fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Routes every request through ScraperAPI so the target sees the proxy, not us.
pub struct ScraperApiClient {
    client: Client,
    api_key: String,
    country_code: String,
}

impl ScraperApiClient {
    pub fn new(api_key: impl Into<String>, country_code: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(ScraperApiClient {
            client,
            api_key: api_key.into(),
            country_code: country_code.into(),
        })
    }

    /// The proxy URL that fetches `target` on our behalf.
    pub fn proxied_url(&self, target: &str) -> Result<Url> {
        let mut params = vec![("api_key", self.api_key.as_str()), ("url", target)];
        if !self.country_code.is_empty() {
            params.push(("country_code", self.country_code.as_str()));
        }
        Url::parse_with_params(SCRAPERAPI_ENDPOINT, &params).map_err(|e| ScrapeError::InvalidUrl {
            url: target.to_string(),
            reason: e.to_string(),
        })
    }

    fn random_user_agent(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
    }
}

impl PageFetcher for ScraperApiClient {
    fn fetch_html(&self, url: &str) -> Result<String> {
        let proxied = self.proxied_url(url)?;
        debug!("Fetching {} via proxy", url);

        let resp = self.client
            .get(proxied)
            .header(USER_AGENT, self.random_user_agent())
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text()?)
    }
}
