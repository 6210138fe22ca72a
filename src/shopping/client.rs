//! HTTP client for the shopping-search API.

use crate::config::Config;
use crate::error::{ConfigError, SearchError};
use crate::shopping::models::{NormalizedOffer, SearchRequest};
use crate::shopping::parser;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};
use wreq::Client;

/// Trait for the shopping-search backend - enables mocking for tests.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Runs one search and returns the raw JSON response.
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError>;
}

/// Client for the real-time product search API.
pub struct ShoppingClient {
    client: Client,
    api_key: String,
    host: String,
    base_url: String,
}

impl ShoppingClient {
    /// Creates a client from configuration. Fails when the API key or host is missing.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let (api_key, host) = config.search_credentials()?;

        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: api_key.to_string(),
            host: host.to_string(),
            base_url: config.search.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, request: &SearchRequest) -> String {
        format!(
            "{}/search-v2?q={}&country={}&language=en&sort_by={}",
            self.base_url,
            urlencoding::encode(&request.query),
            urlencoding::encode(&request.country),
            request.sort_by.as_str()
        )
    }
}

#[async_trait]
impl ProductSearch for ShoppingClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        let url = self.search_url(request);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", self.api_key.as_str())
            .header("x-rapidapi-host", self.host.as_str())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(SearchError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Searches for `request.query` and returns relevant offers, cheapest first.
///
/// Upstream failures are logged and degrade to an empty list; nothing is retried.
pub async fn search_offers(
    client: &dyn ProductSearch,
    request: &SearchRequest,
) -> Vec<NormalizedOffer> {
    info!(
        "Searching for '{}' in {} (sort: {})",
        request.query,
        request.country.to_uppercase(),
        request.sort_by
    );

    let response = match client.search(request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Search failed: {}", e);
            return Vec::new();
        }
    };

    let offers = parser::parse_offers(&response, request);
    info!("Found {} relevant results in {}", offers.len(), request.country.to_uppercase());
    offers
}
