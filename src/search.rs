use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{CrawlerConfig, HarvestError, Result};

/// The `SearchClient` struct wraps the Google Custom Search JSON API.
/// One call returns a bounded, ordered list of result URLs for a query.
pub struct SearchClient {
    /// The HTTP client used for API calls.
    client: Client,
    /// The API key sent with every request.
    api_key: String,
    /// The programmable search engine id.
    engine_id: String,
    /// The endpoint base URL; configurable so tests can redirect it.
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    link: Option<String>,
}

impl SearchClient {
    /// Creates a new `SearchClient` from the crawler configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(crate::SEARCH_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(HarvestError::RequestError)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            endpoint: config.search_endpoint.clone(),
        })
    }

    /// Performs one search and returns the result URLs in API order.
    ///
    /// Empty and missing links are filtered out. A transport failure or a
    /// non-success status is returned as an error; the caller decides what
    /// a failed search means for the run.
    ///
    /// # Arguments
    ///
    /// * `query` - The search phrase.
    /// * `count` - The number of results to request.
    ///
    /// # Returns
    ///
    /// A `Result` containing the result URLs, or an error if the call fails.
    pub async fn search(&self, query: &str, count: u8) -> Result<Vec<String>> {
        let url = format!(
            "{}?key={}&cx={}&q={}&num={}",
            self.endpoint,
            self.api_key,
            self.engine_id,
            urlencoding::encode(query),
            count
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!("Search response status: {}", status);

        if !status.is_success() {
            return Err(HarvestError::SearchError(format!(
                "API returned {} for query '{}'",
                status, query
            )));
        }

        let parsed: SearchResponse = response.json().await?;

        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| item.link)
            .filter(|link| !link.is_empty())
            .collect())
    }
}
