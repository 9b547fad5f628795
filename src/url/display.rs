use super::{percent_decode, split_url};

/// Derives the human-facing URL used as the key of crawl results
///
/// When the path carries percent-escapes (typically Japanese page names),
/// returns `scheme://netloc` + decoded path; query and fragment are dropped
/// in that case. Otherwise the input is returned unchanged.
///
/// Callers collapse `…/index.html` separately with [`strip_index_suffix`].
///
/// # Examples
///
/// ```
/// use clinic_seo::url::display_url;
///
/// assert_eq!(
///     display_url("https://clinic.jp/%E8%A8%BA%E7%99%82/"),
///     "https://clinic.jp/診療/"
/// );
/// assert_eq!(display_url("https://clinic.jp/access?x=1"), "https://clinic.jp/access?x=1");
/// ```
pub fn display_url(raw: &str) -> String {
    let parts = split_url(raw);
    let decoded_path = percent_decode(parts.path);

    if decoded_path != parts.path {
        format!("{}://{}{}", parts.scheme, parts.netloc, decoded_path)
    } else {
        raw.to_string()
    }
}

/// Drops a trailing `index.html` so a directory and its index page share a key
///
/// The slash before `index.html` is kept: `https://x.com/index.html` becomes
/// `https://x.com/`.
pub fn strip_index_suffix(display: &str) -> &str {
    if display.ends_with("/index.html") {
        &display[..display.len() - "index.html".len()]
    } else {
        display
    }
}
