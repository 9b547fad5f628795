use crate::crawler::ScrapedPage;
use regex::Regex;
use std::sync::LazyLock;

/// System message sent with every request
pub const SYSTEM_PROMPT: &str =
    "あなたはSEO専門家です。クリニックのウェブサイト最適化を支援します。";

/// Optional prefecture followed by the shortest run ending in a municipality
/// suffix
static CITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.+?[都道府県])?(.+?[市区町村])").expect("hardcoded regex pattern is valid")
});

/// Cuts an address down to prefecture + municipality
///
/// Addresses without a municipality suffix are returned unchanged.
///
/// # Example
///
/// ```
/// use clinic_seo::proposal::extract_city;
///
/// assert_eq!(extract_city("東京都世田谷区桜新町1-2-3"), "東京都世田谷区");
/// assert_eq!(extract_city("Main Street 1"), "Main Street 1");
/// ```
pub fn extract_city(address: &str) -> String {
    CITY.find(address)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| address.to_string())
}

/// Builds the user prompt for one page
///
/// Only the first `content_chars` characters of the page text are included.
/// The answer format lines are what [`super::parse_response`] reads back.
pub fn build_prompt(page: &ScrapedPage, seo_goal: &str, content_chars: usize) -> String {
    let excerpt: String = page.content.chars().take(content_chars).collect();
    let city = extract_city(&page.address);

    format!(
        "クリニックのウェブページのSEO最適化を行ってください。\n\
         \n\
         現在のタイトル: {title}\n\
         現在のディスクリプション: {description}\n\
         クリニック所在地: {city}\n\
         SEO目標: {goal}\n\
         \n\
         ページコンテンツ:\n\
         {excerpt}\n\
         \n\
         タスク:\n\
         1. 最適化されたタイトルを3つ提案してください。冒頭にページ名を入れてください。\n\
         2. 最適化されたディスクリプションを3つ提案してください。冒頭にページ名を入れてください。\n\
         3. 必要な場合のみ、所在地（市区町村まで）を含めてください。\n\
         4. 個人情報はタイトルとディスクリプションに含めないでください。\n\
         \n\
         回答は以下の形式で提供してください：\n\
         タイトル案1: [提案]\n\
         タイトル案2: [提案]\n\
         タイトル案3: [提案]\n\
         ディスクリプション案1: [提案]\n\
         ディスクリプション案2: [提案]\n\
         ディスクリプション案3: [提案]\n",
        title = page.title,
        description = page.description,
        city = city,
        goal = seo_goal,
        excerpt = excerpt,
    )
}
