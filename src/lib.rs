//! Clinic-SEO: crawl a clinic website and propose better page metadata
//!
//! This crate implements a bounded breadth-first crawler for a single clinic
//! site, extracts per-page SEO metadata, anonymizes practitioner details, and
//! asks a chat-completion model for optimized titles and descriptions.

pub mod config;
pub mod crawler;
pub mod output;
pub mod preprocess;
pub mod proposal;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while retrieving a single page
///
/// These are page-scoped: the crawler reports them through the progress
/// callback and moves on to the next URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed fetch was issued for
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Errors from the proposal generator
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API response contained no message content")]
    EmptyResponse,
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for proposal generation
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape_clinic_site, CrawlResult, Crawler, ScrapedPage, PAGE_BUDGET};
pub use url::{display_url, is_in_scope, normalize_url};
