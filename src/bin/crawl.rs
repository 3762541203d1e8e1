use std::time::Instant;

use anyhow::Context;
use leadharvest::{crawler, CrawlerConfig};

/// The crawler entry point.
///
/// Loads the configuration from the environment, runs one full crawl over
/// the query list and prints the run summary. Missing credentials or a
/// missing query file abort with a non-zero exit before any work starts.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CrawlerConfig::from_env().context("crawler startup")?;

    let start_time = Instant::now();
    let summary = crawler::run(&config).await?;
    let elapsed = start_time.elapsed();

    println!("\n=== Crawl Summary ===");
    println!("Queries processed: {}", summary.queries);
    println!("Searches failed: {}", summary.searches_failed);
    println!("Pages fetched: {}", summary.pages_fetched);
    println!("Fetches failed: {}", summary.fetches_failed);
    println!("Leads written: {}", summary.leads_written);
    println!("Processing time: {:.2?}", elapsed);

    Ok(())
}
