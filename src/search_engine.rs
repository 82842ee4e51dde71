use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use log::{info, debug};
use url::Url;

use crate::error::Result;
use crate::extractor::cleanup_text;
use crate::proxy::PageFetcher;
use crate::query_builder::SearchQuery;

static A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static H3_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("valid selector"));
// Google has shipped several snippet containers over time.
static SNIPPET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".VwiC3b, [data-sncf], .IsZvec, .st").expect("valid selector")
});

const RESULT_CONTAINER_CLASSES: [&str; 3] = ["g", "MjjYud", "tF2Cxc"];

/// A search hit that has not been fetched yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchCandidate {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl SearchCandidate {
    pub fn new(url: impl Into<String>) -> Self {
        SearchCandidate { url: url.into(), ..Default::default() }
    }
}

pub struct SearchEngine<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> SearchEngine<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        SearchEngine { fetcher }
    }

    /// Any fetch failure here ends the run; an empty list does not.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchCandidate>> {
        info!("Searching for: '{}'", query.text);
        let html = self.fetcher.fetch_html(&query.google_url())?;
        let candidates = parse_google_results(&html, query.num_results);
        info!("Found {} candidate pages", candidates.len());
        Ok(candidates)
    }
}

/// Collects at most `limit` unique result links, in page order.
pub fn parse_google_results(html: &str, limit: usize) -> Vec<SearchCandidate> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for anchor in document.select(&A_SELECTOR) {
        if candidates.len() >= limit {
            break;
        }
        let Some(link) = anchor.value().attr("href").and_then(candidate_link) else {
            continue;
        };
        if !seen.insert(link.clone()) {
            continue;
        }

        let title = anchor
            .select(&H3_SELECTOR)
            .next()
            .map(|h3| cleanup_text(&h3.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty());

        debug!("Candidate: {}", link);
        candidates.push(SearchCandidate {
            url: link,
            title,
            snippet: result_snippet(anchor),
        });
    }

    candidates
}

/// Unwraps Google's `/url?q=` redirects and rejects anything pointing back at Google.
fn candidate_link(href: &str) -> Option<String> {
    let link = if let Some(rest) = href.strip_prefix("/url?q=") {
        let raw = rest.split('&').next()?;
        urlencoding::decode(raw).ok()?.into_owned()
    } else if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        return None;
    };

    let parsed = Url::parse(&link).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if is_google_host(parsed.host_str()?) {
        return None;
    }
    Some(link)
}

fn is_google_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host.starts_with("google.")
        || host.contains(".google.")
        || ["gstatic.com", "googleusercontent.com"]
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

fn result_snippet(anchor: ElementRef) -> Option<String> {
    let container = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|c| RESULT_CONTAINER_CLASSES.contains(&c)))?;

    container
        .select(&SNIPPET_SELECTOR)
        .map(|el| cleanup_text(&el.text().collect::<Vec<_>>().join(" ")))
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::query_builder::Locale;
    use std::cell::RefCell;

    const GOOGLE_PAGE: &str = r#"
        <html><body>
          <a href="https://accounts.google.com/ServiceLogin">Sign in</a>
          <div class="g">
            <a href="/url?q=https://acme-chem.cn/about%3Flang%3Den&amp;sa=U&amp;ved=xyz"><h3>Acme Chemicals | Home</h3></a>
            <div class="VwiC3b">Leading   supplier of industrial solvents.</div>
          </div>
          <div class="g">
            <a href="https://www.sino-resin.com/"><h3>Sino Resin</h3></a>
          </div>
          <a href="/url?q=https://acme-chem.cn/about%3Flang%3Den&amp;sa=U">dup</a>
          <a href="/url?q=https://maps.google.com/maps%3Fq%3Dacme&amp;sa=U">map</a>
          <a href="/search?q=next">Next</a>
          <a href="mailto:x@y.com">mail</a>
          <a href="/url?q=https://third.example.org/&amp;sa=U">third</a>
        </body></html>
    "#;

    #[test]
    fn test_parses_redirects_direct_links_and_skips_google() {
        let results = parse_google_results(GOOGLE_PAGE, 10);
        let urls: Vec<&str> = results.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://acme-chem.cn/about?lang=en",
                "https://www.sino-resin.com/",
                "https://third.example.org/",
            ]
        );
        assert_eq!(results[0].title.as_deref(), Some("Acme Chemicals | Home"));
        assert_eq!(
            results[0].snippet.as_deref(),
            Some("Leading supplier of industrial solvents.")
        );
        assert_eq!(results[1].snippet, None);
        assert_eq!(results[2].title, None);
    }

    #[test]
    fn test_never_returns_more_than_requested() {
        for n in 0..5 {
            assert!(parse_google_results(GOOGLE_PAGE, n).len() <= n);
        }
        assert_eq!(parse_google_results(GOOGLE_PAGE, 2).len(), 2);
    }

    #[test]
    fn test_page_without_results_is_empty_not_error() {
        assert!(parse_google_results("<html><body>No results</body></html>", 10).is_empty());
    }

    #[test]
    fn test_google_hosts() {
        assert!(is_google_host("www.google.com"));
        assert!(is_google_host("google.co.uk"));
        assert!(is_google_host("encrypted-tbn0.gstatic.com"));
        assert!(is_google_host("gstatic.com"));
        assert!(is_google_host("lh3.googleusercontent.com"));
        assert!(!is_google_host("notgstatic.com"));
        assert!(!is_google_host("mygoogleusercontent.com"));
        assert!(!is_google_host("googlefan.example.com"));
        assert!(!is_google_host("acme.cn"));
    }

    struct RecordingFetcher {
        requested: RefCell<Vec<String>>,
        response: Option<String>,
    }

    impl PageFetcher for RecordingFetcher {
        fn fetch_html(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            self.response.clone().ok_or(ScrapeError::Api { status: 500, url: url.to_string() })
        }
    }

    fn query(n: usize) -> SearchQuery {
        SearchQuery::build("chemical suppliers", Locale::default(), n).unwrap()
    }

    #[test]
    fn test_search_requests_google_url_and_limits_results() {
        let fetcher = RecordingFetcher {
            requested: RefCell::new(Vec::new()),
            response: Some(GOOGLE_PAGE.to_string()),
        };
        let results = SearchEngine::new(&fetcher).search(&query(1)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            fetcher.requested.borrow().clone(),
            vec!["https://www.google.com/search?q=chemical%20suppliers&num=1".to_string()]
        );
    }

    #[test]
    fn test_search_failure_is_propagated() {
        let fetcher = RecordingFetcher { requested: RefCell::new(Vec::new()), response: None };
        let err = SearchEngine::new(&fetcher).search(&query(5)).unwrap_err();
        assert!(matches!(err, ScrapeError::Api { status: 500, .. }));
    }
}
