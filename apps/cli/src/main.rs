//! Blogsmith CLI — blog ingestion and AI enhancement tool.
//!
//! Scrapes articles from a blog listing into a persistence API and publishes
//! AI-rewritten derivatives of the latest stored article.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
