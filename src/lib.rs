//! shopscanner - Photograph a product, find where it is sold cheapest
//!
//! A vision model turns the photo into a search query, a shopping-search API
//! returns merchant offers, and the offers are normalized, filtered for
//! relevance and sorted by price.

pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod output;
pub mod server;
pub mod shopping;
pub mod vision;

pub use config::Config;
pub use shopping::{Currency, NormalizedOffer, SearchRequest, SortBy};
pub use vision::{IdentificationRequest, MediaType};
