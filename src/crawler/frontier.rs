//! Frontier and visited-set bookkeeping for a single crawl
//!
//! The frontier is a plain FIFO, so pages are visited breadth-first. The same
//! page may sit in the queue several times under different raw URLs; the
//! visited check when a URL is popped is what guarantees each normalized URL
//! is fetched at most once.

use indexmap::IndexSet;
use std::collections::VecDeque;

/// Whether the crawl loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Running,
    Done,
}

/// Queue of raw URLs to visit plus the normalized keys already visited
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Normalized keys in visit order
    visited: IndexSet<String>,

    /// Raw URLs awaiting a visit
    to_visit: VecDeque<String>,
}

impl CrawlState {
    /// Creates the initial state: only the seed queued, nothing visited
    pub fn new(seed_url: &str) -> Self {
        Self {
            visited: IndexSet::new(),
            to_visit: VecDeque::from([seed_url.to_string()]),
        }
    }

    /// Returns `Done` once the frontier is empty or the page budget is spent
    pub fn phase(&self, scraped: usize, page_budget: usize) -> CrawlPhase {
        if self.to_visit.is_empty() || scraped >= page_budget {
            CrawlPhase::Done
        } else {
            CrawlPhase::Running
        }
    }

    /// Pops the oldest queued URL
    pub fn pop_next(&mut self) -> Option<String> {
        self.to_visit.pop_front()
    }

    /// Queues a raw URL; duplicates are allowed
    pub fn enqueue(&mut self, url: String) {
        self.to_visit.push_back(url);
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Records a normalized key as visited; returns false if it already was
    pub fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    /// Visited keys in the order they were visited
    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_size(&self) -> usize {
        self.to_visit.len()
    }
}
