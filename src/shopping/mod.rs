//! Shopping-search stage: API client, offer models and response normalization.

pub mod client;
pub mod models;
pub mod parser;

pub use client::{search_offers, ProductSearch, ShoppingClient};
pub use models::{Currency, NormalizedOffer, SearchRequest, SortBy};
