use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quill_client::{QuotesExtractor, ReqwestFetcher, ensure_resolvable};
use quill_core::export::{export_filename, write_csv};
use quill_core::{
    CollectService, CollectionResult, Quote, QuoteStats, ScraperConfig, TracingCollectReporter,
};

const SAMPLE_QUOTES: usize = 3;
const SAMPLE_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "quill", version, about = "Scrape quotes.toscrape.com into a CSV file")]
struct Cli {
    /// Number of listing pages to visit
    #[arg(default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Site root (overrides QUILL_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Pause between page fetches in milliseconds (overrides QUILL_REQUEST_DELAY_MS)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// CSV destination (defaults to quotes_export_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("quill=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ScraperConfig::from_env().context("Invalid configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config
            .with_base_url(base_url)
            .context("Invalid --base-url")?;
    }
    if let Some(ms) = cli.delay_ms {
        config = config.with_request_delay(Duration::from_millis(ms));
    }

    ensure_resolvable(&config.base_url)
        .await
        .with_context(|| format!("Cannot reach {}", config.base_url))?;

    let fetcher = ReqwestFetcher::from_config(&config).context("Failed to create HTTP client")?;
    let extractor = QuotesExtractor::new().context("Failed to build quote extractor")?;
    let collector = CollectService::new(fetcher, extractor, config);

    let result = collector
        .collect(cli.pages, &TracingCollectReporter)
        .await
        .context("Collection failed")?;

    print_summary(&result);

    if result.records.is_empty() {
        println!("No quotes to export");
        return Ok(());
    }

    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(export_filename(Utc::now())));
    write_csv(&result.records, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Exported {} quotes to {}", result.records.len(), path.display());

    Ok(())
}

fn print_summary(result: &CollectionResult) {
    let stats = QuoteStats::from_quotes(&result.records);

    println!("Scraped {} pages ({})", result.pages_visited, result.stop_reason);
    if !result.failed_pages.is_empty() {
        let failed: Vec<String> = result.failed_pages.iter().map(u32::to_string).collect();
        println!("Failed pages: {}", failed.join(", "));
    }
    println!("Total Quotes: {}", stats.total_quotes);
    println!("Unique Authors: {}", stats.unique_authors);
    println!("Unique Tags: {}", stats.unique_tags);

    if !result.records.is_empty() {
        println!("\nSample quotes:");
        for quote in result.records.iter().take(SAMPLE_QUOTES) {
            println!("  - {}", sample_line(quote));
        }
        println!();
    }
}

/// Cut `text` to at most `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn sample_line(quote: &Quote) -> String {
    format!("{} ({})", truncate(&quote.text, SAMPLE_WIDTH), quote.author)
}
