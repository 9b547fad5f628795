//! Clinic-SEO main entry point
//!
//! This is the command-line interface for the Clinic-SEO crawler and proposal
//! generator.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use clinic_seo::config::{load_config_with_hash, Config};
use clinic_seo::crawler::{scrape_clinic_site, HttpFetcher, FAILURE_PREFIX, PAGE_BUDGET};
use clinic_seo::output::{format_pages, format_proposals};
use clinic_seo::preprocess::preprocess_pages;
use clinic_seo::proposal::{generate_proposals, ChatCompletionsClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Clinic-SEO: SEO title/description proposals for a clinic website
///
/// Crawls up to 30 pages of the site, anonymizes practitioner details in the
/// page text, and asks a chat-completion model for improved titles and
/// descriptions. Pages whose URL contains "blog" are never crawled.
#[derive(Parser, Debug)]
#[command(name = "clinic-seo")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a clinic site and propose SEO titles/descriptions", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Clinic site URL to start crawling from
    #[arg(long, value_name = "URL", required_unless_present = "dry_run")]
    url: Option<String>,

    /// SEO goal passed to the model with every page
    #[arg(long, value_name = "TEXT", required_unless_present_any = ["crawl_only", "dry_run"])]
    goal: Option<String>,

    /// Only crawl and print the scraped pages, without generating proposals
    #[arg(long, conflicts_with = "dry_run")]
    crawl_only: bool,

    /// Validate config and show settings without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let Some(seed_url) = cli.url.as_deref() else {
        bail!("--url is required");
    };

    handle_run(&config, seed_url, cli.goal.as_deref(), cli.crawl_only).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("clinic_seo=info,warn"),
            1 => EnvFilter::new("clinic_seo=debug,info"),
            2 => EnvFilter::new("clinic_seo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Clinic-SEO Dry Run ===\n");

    println!("Crawler:");
    println!("  Page budget: {}", PAGE_BUDGET);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nGenerator:");
    println!("  Endpoint: {}", config.generator.endpoint);
    println!("  Model: {}", config.generator.model);
    println!("  API key variable: {}", config.generator.api_key_env);
    println!("  Content characters per prompt: {}", config.generator.content_chars);

    println!("\n✓ Configuration is valid");
}

/// Crawls, anonymizes and either prints pages or generates proposals
async fn handle_run(
    config: &Config,
    seed_url: &str,
    goal: Option<&str>,
    crawl_only: bool,
) -> anyhow::Result<()> {
    // Resolve the generator before crawling so a missing key fails fast
    let generator = if crawl_only {
        None
    } else {
        Some(ChatCompletionsClient::from_config(&config.generator)?)
    };

    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.fetcher)
        .context("failed to build HTTP client")?;

    let pages = scrape_clinic_site(&fetcher, seed_url, |progress, message| {
        if message.starts_with(FAILURE_PREFIX) {
            tracing::warn!("[{:>3.0}%] {}", progress * 100.0, message);
        } else {
            tracing::info!("[{:>3.0}%] {}", progress * 100.0, message);
        }
    })
    .await;

    if pages.is_empty() {
        bail!("no pages could be scraped from {}", seed_url);
    }

    tracing::info!("Anonymizing {} pages", pages.len());
    let processed = preprocess_pages(&pages);

    let Some(generator) = generator else {
        print!("{}", format_pages(seed_url, &processed, Utc::now()));
        return Ok(());
    };

    let goal = goal.context("--goal is required unless --crawl-only is given")?;
    tracing::info!("Generating proposals with {}", generator.model());
    let proposals = generate_proposals(
        &generator,
        &processed,
        goal,
        config.generator.content_chars,
    )
    .await?;

    print!("{}", format_proposals(seed_url, &proposals, Utc::now()));
    tracing::info!("Done: proposals for {} pages", proposals.len());

    Ok(())
}
