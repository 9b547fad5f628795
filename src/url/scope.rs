use super::split_url;
use url::Url;

/// File extensions the crawler never fetches
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar",
];

/// Sections whose sub-pages are skipped (the section index itself is kept)
pub const NEWS_SECTIONS: &[&str] = &["news", "topics", "information"];

/// One of the independent predicates a URL must pass to be crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRule {
    /// Host and port must equal the seed's
    SameDomain,
    /// URL must not contain "blog" anywhere
    NotBlog,
    /// Path must not end with an excluded document/archive extension
    NotExcludedFile,
    /// Path must not be below a news-like section
    NotNewsSubpage,
}

impl ScopeRule {
    /// All rules, in evaluation order
    pub const ALL: [ScopeRule; 4] = [
        ScopeRule::SameDomain,
        ScopeRule::NotBlog,
        ScopeRule::NotExcludedFile,
        ScopeRule::NotNewsSubpage,
    ];

    /// Returns true if the URL passes this rule
    pub fn allows(&self, url: &str, base_domain: &str) -> bool {
        match self {
            Self::SameDomain => is_same_domain(url, base_domain),
            Self::NotBlog => !is_blog_page(url),
            Self::NotExcludedFile => !is_excluded_file(url),
            Self::NotNewsSubpage => !is_news_subpage(url),
        }
    }
}

/// Returns the host (with port, if any) that scopes a crawl from this seed
///
/// # Examples
///
/// ```
/// use clinic_seo::url::base_domain;
///
/// assert_eq!(base_domain("http://Clinic.jp/"), "clinic.jp");
/// assert_eq!(base_domain("http://x.com:80/"), "x.com");
/// assert_eq!(base_domain("http://x.com:8080/"), "x.com:8080");
/// ```
pub fn base_domain(seed_url: &str) -> String {
    host_key(seed_url)
}

/// Host in the form `Url` serializes it: lowercase ASCII, IDN labels in
/// punycode, default port dropped
///
/// Strings `Url` cannot parse fall back to their raw netloc.
fn host_key(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        },
        Err(_) => split_url(raw).netloc.to_string(),
    }
}

/// Returns the first rule the URL fails, or None if it is in scope
pub fn first_rejection(url: &str, base_domain: &str) -> Option<ScopeRule> {
    ScopeRule::ALL
        .into_iter()
        .find(|rule| !rule.allows(url, base_domain))
}

/// Returns true if the URL passes every scope rule
///
/// # Examples
///
/// ```
/// use clinic_seo::url::is_in_scope;
///
/// assert!(is_in_scope("http://x.com/access/", "x.com"));
/// assert!(!is_in_scope("http://other.com/page", "x.com"));
/// assert!(!is_in_scope("http://x.com/blog/2024/post", "x.com"));
/// assert!(!is_in_scope("http://x.com/files/price.PDF", "x.com"));
/// assert!(!is_in_scope("http://x.com/news/2024/article", "x.com"));
/// ```
pub fn is_in_scope(url: &str, base_domain: &str) -> bool {
    first_rejection(url, base_domain).is_none()
}

/// Compares the canonical host and port against `base_domain`
///
/// `www.` is not stripped and the scheme is ignored.
pub fn is_same_domain(url: &str, base_domain: &str) -> bool {
    host_key(url) == base_domain
}

/// Substring match over the whole URL, so hosts and query strings count too
pub fn is_blog_page(url: &str) -> bool {
    url.to_lowercase().contains("blog")
}

pub fn is_excluded_file(url: &str) -> bool {
    let path = split_url(url).path.to_lowercase();
    EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// True for `/news/<anything>` style paths, false for the bare `/news/` index
pub fn is_news_subpage(url: &str) -> bool {
    let path = split_url(url).path.trim_matches('/');
    let mut segments = path.split('/');

    match (segments.next(), segments.next()) {
        (Some(first), Some(_)) => NEWS_SECTIONS.contains(&first.to_lowercase().as_str()),
        _ => false,
    }
}
