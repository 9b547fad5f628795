use super::{percent_decode, split_url};

/// Normalizes a URL into the key used for visited-set membership
///
/// # Normalization Steps
///
/// 1. Decode percent-escapes in the whole URL
/// 2. Drop the fragment
/// 3. Drop the query string (pages differing only by query are one page)
/// 4. Strip a trailing `/index.html` from the path
/// 5. Strip trailing slashes, then append exactly one
/// 6. Key = `scheme://netloc` + path
///
/// Never fails: malformed input runs through the same steps and yields a
/// best-effort key.
///
/// Decoding happens once per call, so a key is a fixed point of this
/// function only when its decoded form contains no `%XX` escape. A
/// double-escaped `%2541` gives `%41` here and `A` when normalized again.
///
/// # Examples
///
/// ```
/// use clinic_seo::url::normalize_url;
///
/// assert_eq!(normalize_url("http://x.com/a"), "http://x.com/a/");
/// assert_eq!(normalize_url("http://x.com/a/index.html"), "http://x.com/a/");
/// assert_eq!(normalize_url("http://x.com/a/?page=2#top"), "http://x.com/a/");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let decoded = percent_decode(raw);
    let parts = split_url(&decoded);

    let mut path = parts.path.trim_end_matches('/');
    if let Some(stripped) = path.strip_suffix("/index.html") {
        path = stripped.trim_end_matches('/');
    }

    format!(
        "{}://{}{}/",
        parts.scheme.to_ascii_lowercase(),
        parts.netloc,
        path
    )
}
