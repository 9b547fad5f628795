//! SEO proposal generation
//!
//! Each scraped page is turned into a prompt, sent to a chat-completion model,
//! and the reply is parsed into candidate titles and descriptions.

mod client;
mod prompt;
mod response;

pub use client::ChatCompletionsClient;
pub use prompt::{build_prompt, extract_city, SYSTEM_PROMPT};
pub use response::parse_response;

use crate::crawler::CrawlResult;
use crate::GenerateResult;
use indexmap::IndexMap;

/// Current metadata of a page alongside the model's suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoProposal {
    pub current_title: String,
    pub current_description: String,

    /// Address cut down to the municipality
    pub clinic_address: String,

    pub proposed_titles: Vec<String>,
    pub proposed_descriptions: Vec<String>,
}

/// Proposals keyed by display URL, in crawl order
pub type ProposalSet = IndexMap<String, SeoProposal>;

/// A text-completion backend
#[allow(async_fn_in_trait)]
pub trait ProposalGenerator {
    /// Returns the model's reply to a single prompt
    async fn complete(&self, prompt: &str) -> GenerateResult<String>;
}

/// Generates proposals for every page, one request per page
///
/// Stops at the first failed request and returns its error.
pub async fn generate_proposals<G: ProposalGenerator>(
    generator: &G,
    pages: &CrawlResult,
    seo_goal: &str,
    content_chars: usize,
) -> GenerateResult<ProposalSet> {
    let mut proposals = ProposalSet::new();

    for (index, (url, page)) in pages.iter().enumerate() {
        tracing::info!(
            "Generating proposals for {} ({}/{})",
            url,
            index + 1,
            pages.len()
        );

        let prompt = build_prompt(page, seo_goal, content_chars);
        let reply = generator.complete(&prompt).await?;
        let proposal = parse_response(&reply, page);

        tracing::debug!(
            "{}: {} titles, {} descriptions",
            url,
            proposal.proposed_titles.len(),
            proposal.proposed_descriptions.len()
        );
        proposals.insert(url.clone(), proposal);
    }

    Ok(proposals)
}
