//! Output module for presenting crawl results and proposals
//!
//! Everything is rendered as markdown text for the CLI to print.

mod markdown;

pub use markdown::{format_pages, format_proposals};
