use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use log::debug;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("valid email pattern")
});
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s-]?)?(?:\(?\d{2,4}\)?[\s-]?)?\d{3,4}[\s-]?\d{3,4}")
        .expect("valid phone pattern")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").expect("valid selector"));
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];
const IMAGE_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const SUMMARY_PARAGRAPHS: usize = 3;
pub const SUMMARY_MAX_CHARS: usize = 300;

/// What a single page yields before it is merged with search metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFields {
    pub name: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub summary: String,
}

/// Pure: the same HTML always yields the same fields.
pub fn extract_fields(html: &str, url: &str) -> PageFields {
    let document = Html::parse_document(html);
    let text = visible_text(&document);
    let (mailto, tel) = contact_links(&document);

    let mut emails = extract_emails(&text);
    merge_unique(&mut emails, extract_emails(&mailto.join(" ")), |e| e.to_lowercase());

    let mut phone_numbers = extract_phones(&text);
    merge_unique(&mut phone_numbers, extract_phones(&tel.join(" ")), |p| p.clone());

    let fields = PageFields {
        name: best_name(&document),
        emails,
        phone_numbers,
        summary: page_summary(&document),
    };
    debug!(
        "Extracted {} emails, {} phones from {}",
        fields.emails.len(),
        fields.phone_numbers.len(),
        url
    );
    fields
}

/// First-seen order, case-insensitive dedup, image filenames dropped.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|email| {
            let lower = email.to_lowercase();
            !IMAGE_SUFFIXES.iter().any(|ext| lower.ends_with(ext)) && seen.insert(lower)
        })
        .collect()
}

/// First-seen order; matches outside 7..=15 digits are noise.
pub fn extract_phones(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PHONE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|phone| {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) && seen.insert(phone.clone())
        })
        .collect()
}

pub fn cleanup_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn merge_unique(into: &mut Vec<String>, extra: Vec<String>, key: impl Fn(&String) -> String) {
    let mut seen: HashSet<String> = into.iter().map(&key).collect();
    for item in extra {
        if seen.insert(key(&item)) {
            into.push(item);
        }
    }
}

fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|el| HIDDEN_TAGS.contains(&el.name()));
        let trimmed = text.trim();
        if !hidden && !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    parts.join(" ")
}

fn contact_links(document: &Html) -> (Vec<String>, Vec<String>) {
    let mut mailto = Vec::new();
    let mut tel = Vec::new();
    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else { continue };
        let href = href.trim();
        let lower = href.to_ascii_lowercase();
        if lower.starts_with("mailto:") {
            mailto.push(decode_link_target(&href[7..]));
        } else if lower.starts_with("tel:") {
            tel.push(decode_link_target(&href[4..]));
        }
    }
    (mailto, tel)
}

fn decode_link_target(target: &str) -> String {
    let target = target.split('?').next().unwrap_or_default();
    urlencoding::decode(target)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| target.to_string())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| cleanup_text(&el.text().collect::<Vec<_>>().join(" ")))
        .find(|t| !t.is_empty())
}

fn meta_content(document: &Html, attr: &str, value: &str) -> Option<String> {
    document
        .select(&META_SELECTOR)
        .filter(|el| el.value().attr(attr).is_some_and(|v| v.trim().eq_ignore_ascii_case(value)))
        .filter_map(|el| el.value().attr("content"))
        .map(cleanup_text)
        .find(|c| !c.is_empty())
}

fn best_name(document: &Html) -> String {
    first_text(document, &TITLE_SELECTOR)
        .or_else(|| first_text(document, &H1_SELECTOR))
        .or_else(|| meta_content(document, "property", "og:site_name"))
        .unwrap_or_default()
}

fn page_summary(document: &Html) -> String {
    let summary = meta_content(document, "name", "description")
        .or_else(|| meta_content(document, "property", "og:description"))
        .unwrap_or_else(|| {
            document
                .select(&P_SELECTOR)
                .map(|p| cleanup_text(&p.text().collect::<Vec<_>>().join(" ")))
                .filter(|t| !t.is_empty())
                .take(SUMMARY_PARAGRAPHS)
                .collect::<Vec<_>>()
                .join(" ")
        });
    truncate_summary(&summary, SUMMARY_MAX_CHARS)
}

/// Cuts on a word boundary and marks the cut with `...`.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLIER_PAGE: &str = r#"
        <html>
          <head>
            <title>  Acme   Chemicals Co., Ltd. </title>
            <meta name="Description" content="Industrial   solvents and resins since 1998.">
            <style>.x { color: red; } fake@style.com</style>
            <script>var contact = "tracker@analytics.com"; var tel = "+1 555 000 1111";</script>
          </head>
          <body>
            <h1>Welcome</h1>
            <p>Contact: Sales@Acme-Chem.cn or sales@acme-chem.cn</p>
            <p>Phone: +86 21 5555 1234, Fax: +86 21 5555 1234</p>
            <img src="logo@2x.png">
            <p>Support: support@acme-chem.cn, office 0755-8888-9999</p>
            <a href="mailto:export@acme-chem.cn?subject=Quote">Email export</a>
            <a href="tel:+8613800138000">Call</a>
            <p>Asset: banner@hero.webp</p>
          </body>
        </html>
    "#;

    #[test]
    fn test_full_page_extraction() {
        let fields = extract_fields(SUPPLIER_PAGE, "https://acme-chem.cn/");
        assert_eq!(fields.name, "Acme Chemicals Co., Ltd.");
        assert_eq!(fields.summary, "Industrial solvents and resins since 1998.");
        assert_eq!(
            fields.emails,
            vec![
                "Sales@Acme-Chem.cn".to_string(),
                "support@acme-chem.cn".to_string(),
                "export@acme-chem.cn".to_string(),
            ]
        );
        assert!(fields.phone_numbers.contains(&"+86 21 5555 1234".to_string()));
        assert!(fields.phone_numbers.contains(&"+8613800138000".to_string()));
        assert!(!fields.emails.iter().any(|e| e.contains("analytics") || e.contains("style")));
    }

    #[test]
    fn test_no_duplicates_in_lists() {
        let fields = extract_fields(SUPPLIER_PAGE, "https://acme-chem.cn/");
        let unique_emails: HashSet<_> = fields.emails.iter().map(|e| e.to_lowercase()).collect();
        assert_eq!(unique_emails.len(), fields.emails.len());
        let unique_phones: HashSet<_> = fields.phone_numbers.iter().collect();
        assert_eq!(unique_phones.len(), fields.phone_numbers.len());
    }

    #[test]
    fn test_page_without_contacts_yields_empty_lists() {
        let html = "<html><head><title>Plain</title></head><body><p>Nothing here.</p></body></html>";
        let fields = extract_fields(html, "https://plain.example/");
        assert!(fields.emails.is_empty());
        assert!(fields.phone_numbers.is_empty());
        assert_eq!(fields.name, "Plain");
        assert_eq!(fields.summary, "Nothing here.");
    }

    #[test]
    fn test_name_falls_back_to_heading_then_site_name() {
        let html = "<html><body><h1> Sino  Resin </h1></body></html>";
        assert_eq!(extract_fields(html, "u").name, "Sino Resin");

        let html = r#"<html><head><meta property="og:site_name" content="Delta Polymers"></head><body></body></html>"#;
        assert_eq!(extract_fields(html, "u").name, "Delta Polymers");

        assert_eq!(extract_fields("<html><body></body></html>", "u").name, "");
    }

    #[test]
    fn test_summary_falls_back_to_paragraphs() {
        let html = r#"
            <html><body>
              <p>First.</p><p>   </p><p>Second.</p><p>Third.</p><p>Fourth.</p>
            </body></html>
        "#;
        assert_eq!(extract_fields(html, "u").summary, "First. Second. Third.");

        let html = r#"<html><head><meta property="og:description" content="OG text"></head></html>"#;
        assert_eq!(extract_fields(html, "u").summary, "OG text");
    }

    #[test]
    fn test_summary_is_truncated_on_word_boundary() {
        let long = "word ".repeat(100);
        let html = format!(r#"<html><head><meta name="description" content="{}"></head></html>"#, long);
        let summary = extract_fields(&html, "u").summary;
        assert!(summary.ends_with("word..."));
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_truncate_summary_short_text_untouched() {
        assert_eq!(truncate_summary("short", 10), "short");
        assert_eq!(truncate_summary("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_summary("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert!(extract_phones("call 123 456").is_empty());
        assert_eq!(extract_phones("call 555-1234567"), vec!["555-1234567".to_string()]);
    }

    #[test]
    fn test_email_image_suffix_filtered() {
        assert!(extract_emails("icon@2x.png hero@3x.JPG").is_empty());
        assert_eq!(extract_emails("a@b.co A@B.CO"), vec!["a@b.co".to_string()]);
    }
}
