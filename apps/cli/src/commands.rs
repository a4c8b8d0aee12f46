//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use url::Url;

use blogsmith_core::{EnhanceOrchestrator, ScrapeOrchestrator};
use blogsmith_corpus::{CorpusClient, CorpusStore};
use blogsmith_scraper::build_client;
use blogsmith_shared::PipelineConfig;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Blogsmith — scrape blog articles and publish AI-enhanced rewrites.
#[derive(Parser)]
#[command(
    name = "blogsmith",
    version,
    about = "Scrape blog articles into a store and publish AI-enhanced rewrites.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape the blog listing and ingest articles into the store.
    Scrape {
        /// Listing URL to scrape (defaults to BLOGSMITH_LISTING_URL).
        #[arg(long)]
        listing_url: Option<String>,

        /// Maximum articles to ingest per run.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rewrite the latest stored article and publish the enhanced version.
    Enhance,

    /// Show the latest stored article.
    Latest,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogsmith=info",
        1 => "blogsmith=debug",
        _ => "blogsmith=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape { listing_url, limit } => {
            cmd_scrape(listing_url.as_deref(), limit).await
        }
        Command::Enhance => cmd_enhance().await,
        Command::Latest => cmd_latest().await,
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(listing_url: Option<&str>, limit: Option<usize>) -> Result<()> {
    let mut config = PipelineConfig::from_env()?;

    if let Some(raw) = listing_url {
        config.listing_url = Url::parse(raw).map_err(|e| eyre!("invalid URL '{raw}': {e}"))?;
    }
    if let Some(limit) = limit {
        config.listing_limit = limit;
    }

    info!(listing = %config.listing_url, limit = config.listing_limit, "scraping blog listing");

    let started = std::time::Instant::now();
    let orchestrator = ScrapeOrchestrator::from_config(config)?;
    let report = orchestrator.run().await?;

    println!();
    println!("  Scrape complete!");
    println!("  Ingested: {}", report.ingested);
    println!("  Skipped:  {}", report.skipped.len());
    println!("  Time:     {:.1}s", started.elapsed().as_secs_f64());
    for (url, reason) in &report.defaulted {
        println!("  (default description) {url}: {reason}");
    }
    for (url, reason) in &report.skipped {
        println!("  (skipped) {url}: {reason}");
    }
    println!();

    Ok(())
}

async fn cmd_enhance() -> Result<()> {
    let config = PipelineConfig::from_env()?;

    info!(model = %config.model, "enhancing latest article");

    let started = std::time::Instant::now();
    let orchestrator = EnhanceOrchestrator::from_config(&config)?;
    let report = orchestrator.run().await?;

    println!();
    println!("  Enhanced article published!");
    println!("  Original:   #{}", report.original_id);
    println!("  Published:  #{}", report.published_id);
    println!("  Source URL: {}", report.published_source_url);
    println!("  References: {}", report.reference_count);
    println!("  Time:       {:.1}s", started.elapsed().as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_latest() -> Result<()> {
    let config = PipelineConfig::from_env()?;

    let http = build_client(config.http_timeout)?;
    let store = CorpusClient::new(http, config.api_base_url.clone());
    let article = store.latest_article().await?;

    println!();
    println!("  Latest article");
    println!("  ID:         #{}", article.id);
    println!("  Title:      {}", article.title);
    println!("  Source URL: {}", article.source_url);
    if let Some(parent) = article.parent_id {
        println!("  Parent:     #{parent} (enhanced)");
    }
    if let Some(created_at) = article.created_at {
        println!("  Created:    {created_at}");
    }
    println!();
    println!("{}", article.content);

    Ok(())
}
