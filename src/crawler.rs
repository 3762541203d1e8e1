use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::extract::EmailExtractor;
use crate::fetch::PageFetcher;
use crate::search::SearchClient;
use crate::store::LeadStore;
use crate::throttle::Throttle;
use crate::{CrawlSummary, CrawlerConfig, HarvestError, Lead, Result};

/// Loads the newline-delimited query list.
///
/// Lines are trimmed and blank lines dropped; file order is kept and
/// duplicates are not collapsed. A missing file is a fatal startup error.
pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HarvestError::ConfigError(format!(
            "Queries file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Runs one full crawl: every query is searched, every result page fetched
/// and scanned, and each query's leads are appended to the table before the
/// next query starts.
///
/// Search and fetch failures are logged with their query or URL, counted,
/// and skipped; only startup problems and lead-table I/O abort the run.
pub async fn run(config: &CrawlerConfig) -> Result<CrawlSummary> {
    let queries = load_queries(&config.queries_file)?;
    info!("Loaded {} queries from {}", queries.len(), config.queries_file);

    let search = SearchClient::new(config)?;
    let fetcher = PageFetcher::new()?;
    let extractor = EmailExtractor::default();
    let store = LeadStore::new(config.leads_file.as_str());
    let throttle = Throttle::new(config.page_delay);

    let mut summary = CrawlSummary {
        queries: queries.len(),
        ..Default::default()
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );

    for query in &queries {
        spinner.set_message(format!("Searching for '{}'...", query));

        let urls = match search.search(query, config.result_count).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Search failed for '{}': {}", query, e);
                summary.searches_failed += 1;
                continue;
            }
        };

        if urls.is_empty() {
            info!("No results for '{}'", query);
            continue;
        }

        let mut batch = Vec::new();
        for url in &urls {
            spinner.set_message(format!("Fetching {}", url));

            match fetcher.fetch(url).await {
                Ok(html) => {
                    summary.pages_fetched += 1;

                    let emails = extractor.extract(&html);
                    if emails.is_empty() {
                        debug!("No emails on {}", url);
                    }
                    for email in emails {
                        info!("Found {} on {}", email, url);
                        batch.push(Lead {
                            query: query.clone(),
                            website: url.clone(),
                            email,
                        });
                    }
                }
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    summary.fetches_failed += 1;
                }
            }

            throttle.pause().await;
        }

        // flush per query so completed queries survive a crash on a later one
        let written = store.append(&batch)?;
        if written > 0 {
            info!("Saved {} rows for '{}'", written, query);
        }
        summary.leads_written += written;
    }

    spinner.finish_with_message(format!("Crawl complete: {} leads", summary.leads_written));

    Ok(summary)
}
