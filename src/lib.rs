use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod outreach;
pub mod search;
pub mod sender;
pub mod store;
pub mod throttle;
pub mod types;

// Re-export commonly used types
pub use config::{CrawlerConfig, SenderConfig};
pub use types::{CrawlSummary, Lead, SendStatus, SendSummary, SentRecord};

/// The `HarvestError` enum represents the errors that can occur across the
/// lead-generation pipeline.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Represents an error that occurs during an HTTP request.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Represents an error returned by the search API.
    #[error("Search failed: {0}")]
    SearchError(String),
    /// Represents an error that occurs while reading or writing a CSV table.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Represents an error that occurs during file I/O.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Represents an error raised by the mail transport.
    #[error("Mail transport failed: {0}")]
    MailError(String),
    /// Represents a fatal configuration problem detected at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A type alias for `Result` with the `HarvestError` error type.
pub type Result<T> = std::result::Result<T, HarvestError>;

// Constants

/// The timeout for a single search API call.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
/// The timeout for a single page fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(12);
/// The maximum number of redirects followed when fetching a page.
pub const MAX_REDIRECTS: usize = 5;
/// The default number of search results requested per query.
pub const DEFAULT_RESULT_COUNT: u8 = 5;
/// The default pause between page fetches.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(800);
/// The default pause between send attempts.
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_secs(1);
/// The user agent presented to crawled sites.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; leadharvest/0.1)";
