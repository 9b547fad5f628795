use super::prompt::extract_city;
use super::SeoProposal;
use crate::crawler::ScrapedPage;

const TITLE_PREFIX: &str = "タイトル案";
const DESCRIPTION_PREFIX: &str = "ディスクリプション案";

/// Parses a model reply into a proposal for `page`
///
/// Lines starting with `タイトル案` or `ディスクリプション案` contribute the
/// text after the first `": "` (or full-width `：`). Other lines, and
/// candidate lines without a separator, are ignored.
pub fn parse_response(reply: &str, page: &ScrapedPage) -> SeoProposal {
    let mut proposal = SeoProposal {
        current_title: page.title.clone(),
        current_description: page.description.clone(),
        clinic_address: extract_city(&page.address),
        proposed_titles: Vec::new(),
        proposed_descriptions: Vec::new(),
    };

    for line in reply.lines() {
        let line = line.trim_end();
        let target = if line.starts_with(TITLE_PREFIX) {
            &mut proposal.proposed_titles
        } else if line.starts_with(DESCRIPTION_PREFIX) {
            &mut proposal.proposed_descriptions
        } else {
            continue;
        };

        match candidate_text(line) {
            Some(text) => target.push(text.to_string()),
            None => tracing::debug!("Ignoring candidate line without separator: {}", line),
        }
    }

    proposal
}

/// Text after the first `": "` or `：`, whichever comes first
fn candidate_text(line: &str) -> Option<&str> {
    let ascii = line.find(": ").map(|idx| (idx, idx + 2));
    let full_width = line.find('：').map(|idx| (idx, idx + '：'.len_utf8()));

    let (_, start) = match (ascii, full_width) {
        (Some(a), Some(f)) => {
            if a.0 < f.0 {
                a
            } else {
                f
            }
        }
        (Some(a), None) => a,
        (None, Some(f)) => f,
        (None, None) => return None,
    };

    Some(line[start..].trim_start())
}
