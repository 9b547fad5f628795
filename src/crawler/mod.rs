//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier and visited set
//! - HTTP fetching behind an injectable trait
//! - Charset correction for mis-declared pages
//! - HTML metadata extraction and link discovery
//! - The bounded breadth-first crawl loop

mod coordinator;
mod encoding;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{scrape_clinic_site, Crawler, FAILURE_PREFIX, PAGE_BUDGET};
pub use encoding::decode_body;
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{CrawlPhase, CrawlState};
pub use parser::{parse_html, ParsedPage, ADDRESS_PLACEHOLDER};

use indexmap::IndexMap;

/// Metadata extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    /// Text of the `<title>` element, trimmed; empty when missing
    pub title: String,

    /// `content` of the description meta tag, trimmed; empty when missing
    pub description: String,

    /// Full text of the page
    pub content: String,

    /// Text of the `<address>` element, or [`ADDRESS_PLACEHOLDER`]
    pub address: String,
}

/// Scraped pages keyed by display URL, in the order they were scraped
///
/// A page that failed to fetch and a page that was never discovered look the
/// same here: neither has an entry.
pub type CrawlResult = IndexMap<String, ScrapedPage>;
