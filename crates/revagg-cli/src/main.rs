use std::io::{BufRead, IsTerminal};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use revagg_core::load_config;
use revagg_pipeline::AggregationService;

#[derive(Debug, Parser)]
#[command(name = "revagg")]
#[command(about = "Aggregate hotel reviews from listing URLs into a spreadsheet")]
struct Cli {
    /// Listing URLs to aggregate. When omitted, URLs are read from stdin,
    /// one per line.
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    // AppConfig's Debug impl redacts credentials.
    tracing::info!(?config, "configuration loaded");

    let urls = if cli.urls.is_empty() {
        read_urls_from_stdin()?
    } else {
        cli.urls
    };
    anyhow::ensure!(!urls.is_empty(), "no URLs given on the command line or stdin");

    let service = AggregationService::from_config(&config)?;
    let result = service.run(urls).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_urls_from_stdin() -> anyhow::Result<Vec<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut urls = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            urls.push(trimmed.to_owned());
        }
    }
    Ok(urls)
}
