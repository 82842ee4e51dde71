use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::PageFields;
use crate::query_builder::Locale;
use crate::search_engine::SearchCandidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    /// 1-based rank of the page in the search results.
    pub serial_number: usize,
    pub name: String,
    pub website: String,
    pub country: String,
    pub region: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub summary: String,
    pub source_urls: Vec<String>,
}

impl SupplierRecord {
    /// Merges page fields with search metadata. `source_urls` always holds the candidate URL.
    pub fn assemble(
        serial_number: usize,
        candidate: &SearchCandidate,
        locale: &Locale,
        fields: PageFields,
    ) -> Self {
        let summary = if fields.summary.is_empty() {
            candidate.snippet.clone().unwrap_or_default()
        } else {
            fields.summary
        };

        SupplierRecord {
            serial_number,
            name: fields.name,
            website: website_origin(&candidate.url),
            country: locale.country.clone(),
            region: locale.region.clone(),
            emails: fields.emails,
            phone_numbers: fields.phone_numbers,
            summary,
            source_urls: vec![candidate.url.clone()],
        }
    }
}

fn website_origin(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.origin().ascii_serialization(),
        _ => url.to_string(),
    }
}
