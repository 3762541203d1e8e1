use reqwest::{redirect::Policy, Client};
use tracing::debug;

use crate::{HarvestError, Result};

/// The `PageFetcher` struct retrieves raw page content for result URLs.
///
/// One GET per URL with a fixed timeout, a bounded redirect count and a
/// descriptive user agent. There are no retries: any failure means the page
/// yielded no content and the crawl moves on.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a new `PageFetcher`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(crate::FETCH_TIMEOUT)
            .redirect(Policy::limited(crate::MAX_REDIRECTS))
            .gzip(true)
            .build()
            .map_err(HarvestError::RequestError)?;

        Ok(Self { client })
    }

    /// Fetches the body of a single URL.
    ///
    /// Timeouts, DNS failures, network errors and non-2xx statuses all
    /// surface as errors; the caller logs and skips the page.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        Ok(body)
    }
}
