//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Popping URLs from the frontier and deduplicating on normalized keys
//! - Applying the scope rules
//! - Fetching, decoding and parsing pages
//! - Enqueueing discovered links
//! - Reporting progress after every fetched or failed page

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{CrawlPhase, CrawlState};
use crate::crawler::parser::parse_html;
use crate::crawler::CrawlResult;
use crate::url::{
    base_domain, display_url, first_rejection, is_in_scope, normalize_url, strip_index_suffix,
};
use url::Url;

/// Maximum number of pages scraped per crawl
pub const PAGE_BUDGET: usize = 30;

/// Prefix of every progress message that reports a failed page
pub const FAILURE_PREFIX: &str = "Error:";

/// Bounded breadth-first crawler for a single site
///
/// The crawler owns no client of its own; every request goes through the
/// injected [`PageFetcher`].
pub struct Crawler<'a, F> {
    fetcher: &'a F,
    page_budget: usize,
}

impl<'a, F: PageFetcher> Crawler<'a, F> {
    /// Creates a crawler with the standard page budget
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            page_budget: PAGE_BUDGET,
        }
    }

    /// Overrides the page budget
    pub fn with_page_budget(mut self, page_budget: usize) -> Self {
        self.page_budget = page_budget;
        self
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    /// Crawls the site rooted at `seed_url`
    ///
    /// `on_progress` receives `(fraction, message)` after every page that was
    /// fetched or failed to fetch. Skipped URLs (already visited, out of scope)
    /// are not reported.
    ///
    /// Fetch failures never abort the crawl; the failing URL simply has no
    /// entry in the result.
    pub async fn run<P>(&self, seed_url: &str, mut on_progress: P) -> CrawlResult
    where
        P: FnMut(f64, &str),
    {
        let seed_url = canonical_seed(seed_url);
        let domain = base_domain(&seed_url);
        let mut state = CrawlState::new(&seed_url);
        let mut pages = CrawlResult::new();
        let mut progress = 0.0;

        tracing::info!(
            "Starting crawl of {} (domain {}, budget {} pages)",
            seed_url,
            domain,
            self.page_budget
        );

        while state.phase(pages.len(), self.page_budget) == CrawlPhase::Running {
            let Some(current_url) = state.pop_next() else {
                break;
            };

            let key = normalize_url(&current_url);
            if state.is_visited(&key) {
                tracing::trace!("Already visited: {}", current_url);
                continue;
            }
            if let Some(rule) = first_rejection(&current_url, &domain) {
                tracing::debug!("Skipping {} ({:?})", current_url, rule);
                continue;
            }

            state.mark_visited(key);

            match self.fetcher.fetch(&current_url).await {
                Ok(fetched) => {
                    if fetched.url != current_url {
                        tracing::debug!("{} redirected to {}", current_url, fetched.url);
                    }
                    let html = fetched.text();
                    let base_url = Url::parse(&current_url).ok();
                    let parsed = parse_html(&html, base_url.as_ref());

                    let display_key = strip_index_suffix(&display_url(&current_url)).to_string();
                    pages.insert(display_key.clone(), parsed.page);

                    let mut queued = 0;
                    for link in parsed.links {
                        if !state.is_visited(&normalize_url(&link))
                            && is_in_scope(&link, &domain)
                        {
                            state.enqueue(link);
                            queued += 1;
                        }
                    }

                    progress = (pages.len() as f64 / self.page_budget as f64).min(1.0);
                    tracing::info!(
                        "Scraped {} ({}/{}), queued {} links, {} in frontier",
                        display_key,
                        pages.len(),
                        self.page_budget,
                        queued,
                        state.frontier_size()
                    );
                    on_progress(progress, &format!("Scraping: {}", display_key));
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", current_url, e);
                    on_progress(
                        progress,
                        &format!(
                            "{} failed to scrape {} - {}",
                            FAILURE_PREFIX, current_url, e
                        ),
                    );
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages scraped, {} URLs visited, {} left in frontier",
            pages.len(),
            state.visited_count(),
            state.frontier_size()
        );

        pages
    }
}

/// Runs the seed through the same parser that resolves links
///
/// Resolved links carry a lowercase, punycode host without a default port;
/// the seed must too, or its domain would match none of them. Unparseable
/// seeds are used as given.
fn canonical_seed(seed_url: &str) -> String {
    Url::parse(seed_url)
        .map(String::from)
        .unwrap_or_else(|_| seed_url.to_string())
}

/// Crawls a clinic site with the standard page budget
///
/// # Example
///
/// ```no_run
/// use clinic_seo::config::{FetcherConfig, UserAgentConfig};
/// use clinic_seo::crawler::{scrape_clinic_site, HttpFetcher};
///
/// # async fn example(user_agent: UserAgentConfig) -> Result<(), reqwest::Error> {
/// let fetcher = HttpFetcher::from_config(&user_agent, &FetcherConfig::default())?;
/// let pages = scrape_clinic_site(&fetcher, "https://clinic.example.jp/", |progress, message| {
///     println!("{:>3.0}% {}", progress * 100.0, message);
/// })
/// .await;
/// println!("scraped {} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape_clinic_site<F, P>(fetcher: &F, seed_url: &str, on_progress: P) -> CrawlResult
where
    F: PageFetcher,
    P: FnMut(f64, &str),
{
    Crawler::new(fetcher).run(seed_url, on_progress).await
}
