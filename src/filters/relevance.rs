//! Title relevance heuristic for shopping results.

use super::Filter;
use crate::shopping::NormalizedOffer;

/// Query words that carry no product meaning.
const STOP_WORDS: &[&str] = &["the", "a", "an", "for", "with", "and", "or", "in", "on", "at"];

/// Category terms that mark a query as being about a main product.
const MAIN_PRODUCT_KEYWORDS: &[&str] = &[
    "smartphone",
    "phone",
    "laptop",
    "tablet",
    "watch",
    "camera",
    "headphones",
    "earbuds",
    "speaker",
];

/// Title terms that mark a listing as an accessory.
const ACCESSORY_KEYWORDS: &[&str] = &[
    "case",
    "cover",
    "charger",
    "cable",
    "adapter",
    "screen protector",
    "holder",
    "mount",
    "stand",
    "bag",
    "pouch",
    "sleeve",
];

/// Minimum share of significant query tokens that must appear in the title.
const MIN_MATCH_RATIO: f64 = 0.3;

/// Decides whether a listing title plausibly matches the search query.
///
/// Significant query tokens (lower-cased, stop words and tokens of two characters or
/// fewer removed) are matched as substrings of the title. Fewer than 30% matching drops
/// the listing. A listing that passes is still dropped when the query names a main
/// product category and the title names an accessory, so "iPhone 15 Pro Case" never
/// answers a smartphone search.
pub fn is_relevant(title: &str, query: &str) -> bool {
    if title.is_empty() || query.is_empty() {
        return true;
    }

    let title = title.to_lowercase();
    let query = query.to_lowercase();

    let terms: Vec<&str> = query
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t) && t.chars().count() > 2)
        .collect();

    if terms.is_empty() {
        return true;
    }

    let matches = terms.iter().filter(|t| title.contains(*t)).count();
    let ratio = matches as f64 / terms.len() as f64;
    if ratio < MIN_MATCH_RATIO {
        return false;
    }

    let query_is_main_product = MAIN_PRODUCT_KEYWORDS.iter().any(|k| query.contains(k));
    let title_is_accessory = ACCESSORY_KEYWORDS.iter().any(|k| title.contains(k));

    !(query_is_main_product && title_is_accessory)
}

/// Keeps offers whose name is relevant to the query they were found for.
pub struct RelevanceFilter {
    query: String,
}

impl RelevanceFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

impl Filter for RelevanceFilter {
    fn matches(&self, offer: &NormalizedOffer) -> bool {
        is_relevant(&offer.name, &self.query)
    }

    fn description(&self) -> String {
        format!("Relevant to: {}", self.query)
    }
}
