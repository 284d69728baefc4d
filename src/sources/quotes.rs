//! Quote API client.
//!
//! Fetches a single quote+author pair, re-fetchable on demand. The
//! endpoint answers with a one-element array.

use crate::error::FetchError;
use crate::models::Quote;
use std::time::Duration;
use tracing::debug;

/// Default quote endpoint.
pub const DEFAULT_QUOTE_URL: &str = "https://api.breakingbadquotes.xyz/v1/quotes";

/// Client for the quote endpoint.
pub struct QuoteClient {
    http_client: reqwest::Client,
    url: String,
}

impl QuoteClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            url: url.into(),
        }
    }

    /// Fetch one quote.
    pub async fn random_quote(&self) -> Result<Quote, FetchError> {
        debug!("Fetching quote: {}", self.url);

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let quotes: Vec<Quote> = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("quote"))?;

        quotes
            .into_iter()
            .next()
            .ok_or(FetchError::MalformedData("quote"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_payload_parses() {
        let json = r#"[{"quote": "I am the one who knocks.", "author": "Walter White"}]"#;
        let quotes: Vec<Quote> = serde_json::from_str(json).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].author, "Walter White");
    }
}
