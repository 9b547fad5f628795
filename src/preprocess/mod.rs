//! Anonymization of scraped page text
//!
//! Page text is sent to an external model, so practitioner names and career
//! histories are masked first. Titles, descriptions and addresses pass through
//! unchanged because they are what the proposals are built from.

use crate::crawler::{CrawlResult, ScrapedPage};
use regex::Regex;
use std::sync::LazyLock;

/// Replacement for a practitioner's name
pub const NAME_MASK: &str = "[医師名]";

/// Replacement for a career-history line
pub const CAREER_MASK: &str = "経歴: [匿名化された経歴]";

/// A role or honorific followed by up to 20 Japanese characters or spaces
///
/// The character class covers CJK punctuation, hiragana, katakana, CJK
/// extension A, unified ideographs, compatibility ideographs and half-width
/// katakana.
static PRACTITIONER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(理事長|院長|医師|先生|Dr\.?)\s*",
        r"[\x{3000}-\x{303f}\x{3040}-\x{309f}\x{30a0}-\x{30ff}\x{3400}-\x{4dbf}",
        r"\x{4e00}-\x{9fff}\x{f900}-\x{faff}\x{ff66}-\x{ff9f}\s]{1,20}",
    ))
    .expect("hardcoded regex pattern is valid")
});

/// `経歴:` (either colon width) through the end of its line
static CAREER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"経歴[:：][^\n]*").expect("hardcoded regex pattern is valid"));

/// Masks practitioner names and career histories in page text
///
/// # Example
///
/// ```
/// use clinic_seo::preprocess::anonymize_content;
///
/// let text = "院長 山田太郎 (内科)\n経歴：東京大学医学部卒業";
/// assert_eq!(
///     anonymize_content(text),
///     "[医師名](内科)\n経歴: [匿名化された経歴]"
/// );
/// ```
pub fn anonymize_content(content: &str) -> String {
    let masked = PRACTITIONER_NAME.replace_all(content, NAME_MASK);
    CAREER_LINE.replace_all(&masked, CAREER_MASK).into_owned()
}

/// Returns a copy of the crawl result with every page's text anonymized
///
/// Keys and order are unchanged.
pub fn preprocess_pages(pages: &CrawlResult) -> CrawlResult {
    pages
        .iter()
        .map(|(url, page)| {
            let processed = ScrapedPage {
                title: page.title.clone(),
                description: page.description.clone(),
                content: anonymize_content(&page.content),
                address: page.address.clone(),
            };
            (url.clone(), processed)
        })
        .collect()
}
