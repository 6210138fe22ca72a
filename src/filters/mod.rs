//! Predicates over normalized offers, combined into chains.

pub mod price;
pub mod relevance;

use crate::shopping::NormalizedOffer;

pub use price::{normalize_price, PriceFilter};
pub use relevance::{is_relevant, RelevanceFilter};

/// A keep/drop decision for one offer.
pub trait Filter: Send + Sync {
    fn matches(&self, offer: &NormalizedOffer) -> bool;

    /// Short human-readable label, used in debug logs.
    fn description(&self) -> String;
}

/// Conjunction of filters. An empty chain keeps everything.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// True when every filter in the chain keeps `offer`.
    pub fn matches(&self, offer: &NormalizedOffer) -> bool {
        self.filters.iter().all(|f| f.matches(offer))
    }

    /// Drops offers that fail the chain. Survivors keep their relative order.
    pub fn apply(&self, mut offers: Vec<NormalizedOffer>) -> Vec<NormalizedOffer> {
        offers.retain(|o| self.matches(o));
        offers
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

/// Assembles a [`FilterChain`] from search parameters and user bounds.
#[derive(Default)]
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires titles to be relevant to `query`.
    pub fn relevant_to(mut self, query: &str) -> Self {
        self.chain.add(RelevanceFilter::new(query));
        self
    }

    /// Bounds the price. A no-op when neither bound is given.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.chain.add(PriceFilter::new(min, max));
        self
    }

    pub fn build(self) -> FilterChain {
        self.chain
    }
}
