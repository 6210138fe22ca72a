//! Search command implementation.

use crate::config::Config;
use crate::filters::FilterChainBuilder;
use crate::format::Formatter;
use crate::output::Output;
use crate::shopping::{search_offers, NormalizedOffer, ProductSearch, SearchRequest, ShoppingClient};
use anyhow::{Context, Result};
use tracing::debug;

/// Searches shopping offers for a text query.
pub struct SearchCommand {
    config: Config,
    output: Output,
}

impl SearchCommand {
    pub fn new(config: Config, output: Output) -> Self {
        Self { config, output }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = ShoppingClient::new(&self.config).context("Failed to create search client")?;

        self.execute_with_client(&client, query).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &dyn ProductSearch, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            anyhow::bail!("Search query must not be empty");
        }

        let offers = self.fetch_offers(client, query).await;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_offers(&offers))
    }

    /// Runs the search stage and applies the user's price bounds and result cap.
    pub(crate) async fn fetch_offers(&self, client: &dyn ProductSearch, query: &str) -> Vec<NormalizedOffer> {
        let request = SearchRequest::new(query, &self.config.country, self.config.sort_by);

        let spinner = self.output.spinner(&format!(
            "Searching prices for '{}' in {}...",
            query,
            request.country.to_uppercase()
        ));
        let offers = search_offers(client, &request).await;
        spinner.finish_and_clear();

        let filters = FilterChainBuilder::new()
            .price_range(self.config.min_price, self.config.max_price)
            .build();

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let mut offers = filters.apply(offers);
        if let Some(max) = self.config.max_results {
            offers.truncate(max);
        }

        offers
    }
}
