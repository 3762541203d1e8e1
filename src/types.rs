use serde::{Deserialize, Serialize};

/// One discovered lead: an email address found on a page that a search
/// query surfaced. Rows are append-only; the serde renames pin the CSV
/// header to `Query,Website,Email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Email")]
    pub email: String,
}

/// The outcome of one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    Sent,
    Failed,
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStatus::Sent => write!(f, "Sent"),
            SendStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One sent-log row, appended immediately after every attempt. The header
/// is `Email,Status,Query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentRecord {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Status")]
    pub status: SendStatus,
    #[serde(rename = "Query")]
    pub query: String,
}

/// Per-run counters reported by the crawl loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Queries read from the input file.
    pub queries: usize,
    /// Search calls that failed and yielded no URLs.
    pub searches_failed: usize,
    /// Pages fetched successfully.
    pub pages_fetched: usize,
    /// Page fetches that failed and were skipped.
    pub fetches_failed: usize,
    /// Lead rows appended to the table.
    pub leads_written: usize,
}

/// Per-run counters reported by the send loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    /// Unique recipients derived from the lead table.
    pub recipients: usize,
    /// Attempts that completed successfully.
    pub sent: usize,
    /// Attempts the transport rejected.
    pub failed: usize,
}
