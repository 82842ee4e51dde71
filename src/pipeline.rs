use log::{info, warn};

use crate::delay_manager::PageDelay;
use crate::error::Result;
use crate::extractor::extract_fields;
use crate::proxy::PageFetcher;
use crate::query_builder::{Locale, SearchQuery};
use crate::record::SupplierRecord;
use crate::search_engine::{SearchCandidate, SearchEngine};

/// Search once, then fetch and extract every candidate in order.
///
/// Only the search step can fail the run. A candidate whose fetch fails is
/// logged and left out; the others are unaffected.
pub fn build_records(
    fetcher: &dyn PageFetcher,
    query: &SearchQuery,
    delay: PageDelay,
) -> Result<Vec<SupplierRecord>> {
    let candidates = SearchEngine::new(fetcher).search(query)?;
    let total = candidates.len();

    let records: Vec<SupplierRecord> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| {
            if i > 0 {
                delay.wait();
            }
            info!("Processing {} / {} : {}", i + 1, total, candidate.url);
            match scrape_candidate(fetcher, i + 1, candidate, &query.locale) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping {}: {}", candidate.url, e);
                    None
                }
            }
        })
        .collect();

    info!("Built {} records from {} candidates", records.len(), total);
    Ok(records)
}

pub fn scrape_candidate(
    fetcher: &dyn PageFetcher,
    serial_number: usize,
    candidate: &SearchCandidate,
    locale: &Locale,
) -> Result<SupplierRecord> {
    let html = fetcher.fetch_html(&candidate.url)?;
    let fields = extract_fields(&html, &candidate.url);
    Ok(SupplierRecord::assemble(serial_number, candidate, locale, fields))
}
