//! HTTP fetcher implementation
//!
//! This module handles network retrieval for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with standard redirect following
//! - Reporting the charset the server declared, for later correction
//! - Error classification

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::crawler::encoding::decode_body;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Charset HTTP/1.1 assigns to `text/*` responses that declare none
const HTTP_DEFAULT_TEXT_CHARSET: &str = "ISO-8859-1";

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// A successfully retrieved page, body still undecoded
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// Raw body bytes
    pub body: Vec<u8>,

    /// Charset the server declared, if any
    pub declared_encoding: Option<String>,
}

impl FetchedPage {
    /// Decodes the body, re-detecting the charset when the declared one is
    /// missing or ISO-8859-1
    pub fn text(&self) -> String {
        decode_body(&self.body, self.declared_encoding.as_deref())
    }
}

/// Something that can retrieve a page by URL
///
/// The crawler is generic over this so that each crawl uses the client it was
/// given, and tests can substitute an in-memory site.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches a URL; any failure is scoped to this one page
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetcher` - Timeout settings
///
/// # Example
///
/// ```no_run
/// use clinic_seo::config::{FetcherConfig, UserAgentConfig};
/// use clinic_seo::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "ClinicSeo".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, fetcher)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let declared_encoding = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(declared_charset);

        let body = response.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: final_url,
            body: body.to_vec(),
            declared_encoding,
        })
    }
}

/// Extracts the charset a Content-Type header declares
///
/// A `text/*` type without a charset parameter declares ISO-8859-1.
fn declared_charset(content_type: &str) -> Option<String> {
    let mut parts = content_type.split(';');
    let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();

    let charset = parts.find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    });

    match charset {
        Some(charset) if !charset.is_empty() => Some(charset),
        _ if mime.starts_with("text/") => Some(HTTP_DEFAULT_TEXT_CHARSET.to_string()),
        _ => None,
    }
}
