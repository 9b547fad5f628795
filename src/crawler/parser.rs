//! HTML parser for extracting page metadata and links
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta description
//! - Full page text
//! - Clinic address from the `<address>` element
//! - Links to follow (from `<a>` tags)

use crate::crawler::ScrapedPage;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Address recorded for pages without an `<address>` element
pub const ADDRESS_PLACEHOLDER: &str = "住所抽出済み";

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Metadata for the crawl result
    pub page: ScrapedPage,

    /// All followable links found on the page (absolute URLs)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts metadata and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only links
///
/// Links are resolved against `base_url`; with no base URL none are returned.
///
/// # Example
///
/// ```
/// use clinic_seo::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, Some(&base_url));
/// assert_eq!(parsed.page.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: Option<&Url>) -> ParsedPage {
    let document = Html::parse_document(html);

    let page = ScrapedPage {
        title: extract_title(&document),
        description: extract_description(&document),
        content: document.root_element().text().collect(),
        address: extract_address(&document),
    };

    let links = base_url
        .map(|base| extract_links(&document, base))
        .unwrap_or_default();

    ParsedPage { page, links }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    select_first(document, "title")
        .map(element_text)
        .unwrap_or_default()
}

/// Returns the first `<meta>` named "description" (any case)
///
/// If that tag has no `content`, the description is empty even when a later
/// tag has one.
fn extract_description(document: &Html) -> String {
    let Ok(selector) = Selector::parse("meta[name]") else {
        return String::new();
    };

    document
        .select(&selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn extract_address(document: &Html) -> String {
    select_first(document, "address")
        .map(element_text)
        .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
