use std::time::Duration;

use crate::{HarvestError, Result};

/// The `CrawlerConfig` struct holds the settings for one crawl run.
/// It is built once at startup from the process environment and passed into
/// each component; nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// The Google Custom Search API key.
    pub api_key: String,
    /// The Google programmable search engine id.
    pub engine_id: String,
    /// The base URL of the search API endpoint.
    pub search_endpoint: String,
    /// The path of the newline-delimited query list.
    pub queries_file: String,
    /// The path of the lead table the crawl appends to.
    pub leads_file: String,
    /// How many search results to request per query.
    pub result_count: u8,
    /// The pause between page fetches.
    pub page_delay: Duration,
}

/// The `SenderConfig` struct holds the settings for one send run.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// The mail account user, also used as the envelope sender.
    pub smtp_user: String,
    /// The mail account app password.
    pub smtp_password: String,
    /// The SMTP server host.
    pub smtp_host: String,
    /// The SMTP server port.
    pub smtp_port: u16,
    /// When set, sends are simulated and always reported successful.
    pub dry_run: bool,
    /// The path of the lead table to read recipients from.
    pub leads_file: String,
    /// The path of the sent log appended to after every attempt.
    pub sent_file: String,
    /// The display name used in the From header.
    pub from_name: String,
    /// The fixed subject line.
    pub subject: String,
    /// The fixed message body.
    pub body: String,
    /// The pause between send attempts.
    pub send_delay: Duration,
}

const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

const DEFAULT_QUERIES_FILE: &str = "queries.txt";
const DEFAULT_LEADS_FILE: &str = "data/leads.csv";
const DEFAULT_SENT_FILE: &str = "data/sent_emails.csv";

const DEFAULT_SUBJECT: &str = "Quick intro from our team";
const DEFAULT_BODY: &str = "Hi,\n\n\
We help businesses improve their web presence and growth.\n\
If you're the right contact, I'd love to share a short overview.\n\n\
Thanks,\nThe Outreach Team\n";

impl CrawlerConfig {
    /// Loads the crawler configuration from the environment.
    ///
    /// `GOOGLE_API_KEY` and `GOOGLE_CSE_ID` are required; a missing value is
    /// a fatal startup error. Everything else falls back to a default.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require("GOOGLE_API_KEY")?,
            engine_id: require("GOOGLE_CSE_ID")?,
            search_endpoint: var_or("SEARCH_ENDPOINT", GOOGLE_SEARCH_ENDPOINT),
            queries_file: var_or("QUERIES_FILE", DEFAULT_QUERIES_FILE),
            leads_file: var_or("LEADS_FILE", DEFAULT_LEADS_FILE),
            result_count: parsed_or("RESULT_COUNT", crate::DEFAULT_RESULT_COUNT),
            page_delay: delay_or("PAGE_DELAY_MS", crate::DEFAULT_PAGE_DELAY),
        })
    }
}

impl SenderConfig {
    /// Loads the sender configuration from the environment.
    ///
    /// `GMAIL_USER` and `GMAIL_APP_PASSWORD` are required even in dry-run
    /// mode, so a misconfigured account is caught before a live run.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_user: require("GMAIL_USER")?,
            smtp_password: require("GMAIL_APP_PASSWORD")?,
            smtp_host: var_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: parsed_or("SMTP_PORT", 587),
            dry_run: parse_dry_run(std::env::var("DRY_RUN").ok().as_deref()),
            leads_file: var_or("LEADS_FILE", DEFAULT_LEADS_FILE),
            sent_file: var_or("SENT_FILE", DEFAULT_SENT_FILE),
            from_name: var_or("FROM_NAME", "Outreach"),
            subject: var_or("OUTREACH_SUBJECT", DEFAULT_SUBJECT),
            body: var_or("OUTREACH_BODY", DEFAULT_BODY),
            send_delay: delay_or("SEND_DELAY_MS", crate::DEFAULT_SEND_DELAY),
        })
    }
}

/// Interprets the `DRY_RUN` flag. Sending is opt-out: only the exact string
/// `true` (case-insensitive) keeps dry-run on, and an unset variable
/// defaults to it.
pub fn parse_dry_run(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => value.eq_ignore_ascii_case("true"),
        None => true,
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| HarvestError::ConfigError(format!("Missing {} in environment", name)))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn delay_or(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
