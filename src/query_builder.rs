use crate::error::{Result, ScrapeError};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Caller-supplied location hints. Never discovered from pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locale {
    pub country: String,
    pub region: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub locale: Locale,
    pub num_results: usize,
}

impl SearchQuery {
    /// Appends country and region to `terms` unless the terms already mention them.
    pub fn build(terms: &str, locale: Locale, num_results: usize) -> Result<Self> {
        let terms = terms.split_whitespace().collect::<Vec<_>>().join(" ");
        if terms.is_empty() {
            return Err(ScrapeError::InvalidConfig("search query is blank".to_string()));
        }

        let mut text = terms;
        for hint in [&locale.country, &locale.region] {
            let hint = hint.trim();
            if !hint.is_empty() && !text.to_lowercase().contains(&hint.to_lowercase()) {
                text.push(' ');
                text.push_str(hint);
            }
        }

        Ok(SearchQuery { text, locale, num_results })
    }

    pub fn google_url(&self) -> String {
        format!(
            "{}?q={}&num={}",
            GOOGLE_SEARCH_URL,
            urlencoding::encode(&self.text),
            self.num_results
        )
    }
}
