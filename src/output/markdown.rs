//! Markdown rendering of crawl results and proposals

use crate::crawler::CrawlResult;
use crate::proposal::ProposalSet;
use chrono::{DateTime, Utc};

/// Characters of page text shown per page in a crawl listing
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Formats scraped pages as markdown
///
/// # Arguments
///
/// * `seed_url` - The URL the crawl started from
/// * `pages` - The crawl result, in crawl order
/// * `generated_at` - Timestamp printed in the header
pub fn format_pages(seed_url: &str, pages: &CrawlResult, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Clinic-SEO Crawl Results\n\n");
    push_run_information(&mut md, seed_url, pages.len(), generated_at);

    for (url, page) in pages {
        md.push_str(&format!("## {}\n\n", url));
        md.push_str(&format!("- **Title**: {}\n", or_dash(&page.title)));
        md.push_str(&format!("- **Description**: {}\n", or_dash(&page.description)));
        md.push_str(&format!("- **Address**: {}\n\n", page.address));

        let preview = squash_whitespace(&page.content);
        let mut chars = preview.chars();
        let head: String = chars.by_ref().take(CONTENT_PREVIEW_CHARS).collect();
        let ellipsis = if chars.next().is_some() { "…" } else { "" };
        md.push_str(&format!("> {}{}\n\n", head, ellipsis));
    }

    md
}

/// Formats proposals as markdown, one section per page
pub fn format_proposals(
    seed_url: &str,
    proposals: &ProposalSet,
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    md.push_str("# Clinic-SEO Proposals\n\n");
    push_run_information(&mut md, seed_url, proposals.len(), generated_at);

    for (url, proposal) in proposals {
        md.push_str(&format!("## {}\n\n", url));

        md.push_str("### Current\n\n");
        md.push_str(&format!("- **Title**: {}\n", or_dash(&proposal.current_title)));
        md.push_str(&format!(
            "- **Description**: {}\n",
            or_dash(&proposal.current_description)
        ));
        md.push_str(&format!("- **Location**: {}\n\n", proposal.clinic_address));

        md.push_str("### Proposed\n\n");
        if proposal.proposed_titles.is_empty() && proposal.proposed_descriptions.is_empty() {
            md.push_str("_No proposals could be parsed from the reply._\n\n");
            continue;
        }
        for (i, title) in proposal.proposed_titles.iter().enumerate() {
            md.push_str(&format!("- **Title {}**: {}\n", i + 1, title));
        }
        for (i, description) in proposal.proposed_descriptions.iter().enumerate() {
            md.push_str(&format!("- **Description {}**: {}\n", i + 1, description));
        }
        md.push('\n');
    }

    md
}

fn push_run_information(md: &mut String, seed_url: &str, count: usize, at: DateTime<Utc>) {
    md.push_str(&format!("- **Site**: {}\n", seed_url));
    md.push_str(&format!("- **Pages**: {}\n", count));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
