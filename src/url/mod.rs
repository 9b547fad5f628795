//! URL handling module for Clinic-SEO
//!
//! This module provides dedup-key normalization, display URL derivation and
//! the scope rules that decide which links the crawler may follow.
//!
//! Keys and display URLs work on raw strings rather than [`url::Url`] because
//! `Url` re-encodes non-ASCII paths, and both must keep decoded (e.g.
//! Japanese) paths intact. Only the domain check parses with `Url`, so that
//! seed and links agree on host case, punycode and default ports.

mod display;
mod normalize;
mod scope;

pub use display::{display_url, strip_index_suffix};
pub use normalize::normalize_url;
pub use scope::{
    base_domain, first_rejection, is_blog_page, is_excluded_file, is_in_scope, is_news_subpage,
    is_same_domain, ScopeRule, EXCLUDED_EXTENSIONS, NEWS_SECTIONS,
};

/// The components of a URL string, borrowed from the input
///
/// Mirrors the generic `scheme://netloc/path?query#fragment` split without
/// validating or re-encoding anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

/// Splits a URL string into its components
///
/// Never fails: input that is not a URL yields empty scheme and netloc with
/// the whole string treated as a path.
///
/// # Examples
///
/// ```
/// use clinic_seo::url::split_url;
///
/// let parts = split_url("https://example.com:8080/a/b?q=1#top");
/// assert_eq!(parts.scheme, "https");
/// assert_eq!(parts.netloc, "example.com:8080");
/// assert_eq!(parts.path, "/a/b");
/// assert_eq!(parts.query, Some("q=1"));
/// assert_eq!(parts.fragment, Some("top"));
/// ```
pub fn split_url(raw: &str) -> UrlParts<'_> {
    let (scheme, mut rest) = match raw.find(':') {
        Some(idx) if is_scheme(&raw[..idx]) => (&raw[..idx], &raw[idx + 1..]),
        _ => ("", raw),
    };

    let mut netloc = "";
    if let Some(after) = rest.strip_prefix("//") {
        let end = after
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after.len());
        netloc = &after[..end];
        rest = &after[end..];
    }

    let (rest, fragment) = match rest.split_once('#') {
        Some((before, frag)) => (before, Some(frag)),
        None => (rest, None),
    };

    let (path, query) = match rest.split_once('?') {
        Some((before, q)) => (before, Some(q)),
        None => (rest, None),
    };

    UrlParts {
        scheme,
        netloc,
        path,
        query,
        fragment,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Decodes percent-escapes, replacing invalid UTF-8 with U+FFFD
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = urlencoding::decode_binary(input.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
