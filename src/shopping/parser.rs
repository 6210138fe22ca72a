//! Normalization of raw shopping-search responses into ranked offers.

use crate::filters::{normalize_price, FilterChainBuilder};
use crate::shopping::models::{NormalizedOffer, SearchRequest};
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Shown when a listing has no product photo.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/200x200?text=No+Image";

/// Display value for a missing title or store.
const UNKNOWN: &str = "Unknown";

/// Location of the product array in the response envelope.
const PRODUCTS_PATH: &str = "/data/products";

// Candidate locations per field, as JSON pointers. First present value wins.
const TITLE_PATHS: &[&str] = &["/product_title"];
const PRICE_PATHS: &[&str] = &["/offer/price", "/product_price", "/price"];
const STORE_PATHS: &[&str] = &["/offer/store_name", "/merchant/name"];
const LINK_PATHS: &[&str] = &["/offer/offer_page_url", "/offer_page_url"];
const IMAGE_PATHS: &[&str] = &["/product_photos/0", "/product_photo"];

/// Returns the raw product items of a search response, or an empty slice when the
/// envelope does not have the expected shape.
pub fn products(response: &Value) -> &[Value] {
    match response.pointer(PRODUCTS_PATH).and_then(Value::as_array) {
        Some(items) => items.as_slice(),
        None => {
            warn!("Search response has no {} array", PRODUCTS_PATH);
            &[]
        }
    }
}

/// Turns a search response into offers sorted ascending by price.
///
/// Items without an extractable price and items whose title is not relevant to the
/// query are dropped. The sort is stable, so equally priced offers keep the order the
/// API returned them in.
pub fn parse_offers(response: &Value, request: &SearchRequest) -> Vec<NormalizedOffer> {
    let relevance = FilterChainBuilder::new().relevant_to(&request.query).build();
    let items = products(response);

    // Relevance sees the raw title: an untitled listing passes, then gets its display name.
    let mut offers: Vec<NormalizedOffer> = items
        .iter()
        .filter_map(|item| extract_offer(item, request))
        .filter(|offer| {
            let keep = relevance.matches(offer);
            if !keep {
                trace!("Dropping irrelevant result: {}", offer.name);
            }
            keep
        })
        .map(with_display_name)
        .collect();

    offers.sort_by(|a, b| a.price.total_cmp(&b.price));

    debug!(
        "Normalized {} of {} results for '{}' ({})",
        offers.len(),
        items.len(),
        request.query,
        request.country
    );

    offers
}

/// Normalizes a single raw item. Returns `None` when no price can be extracted.
pub fn parse_offer(item: &Value, request: &SearchRequest) -> Option<NormalizedOffer> {
    extract_offer(item, request).map(with_display_name)
}

/// Like `parse_offer`, but leaves `name` empty when the item has no usable title.
fn extract_offer(item: &Value, request: &SearchRequest) -> Option<NormalizedOffer> {
    let price = normalize_price(first_present(item, PRICE_PATHS));
    if price == 0.0 {
        trace!("Skipping result without a price");
        return None;
    }

    Some(NormalizedOffer {
        name: first_string(item, TITLE_PATHS).unwrap_or_default(),
        price,
        currency: request.currency(),
        store: first_string(item, STORE_PATHS).unwrap_or_else(|| UNKNOWN.to_string()),
        link: first_string(item, LINK_PATHS),
        image: first_string(item, IMAGE_PATHS).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
    })
}

fn with_display_name(mut offer: NormalizedOffer) -> NormalizedOffer {
    if offer.name.is_empty() {
        offer.name = UNKNOWN.to_string();
    }
    offer
}

/// Tries each pointer in order and returns the first value that is present.
fn first_present<'a>(item: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().filter_map(|p| item.pointer(p)).find(|v| is_present(v))
}

/// Like `first_present`, restricted to string values.
fn first_string(item: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| item.pointer(p))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Null, empty strings, zero, false and empty containers count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::models::{Currency, SortBy};
    use serde_json::json;

    fn request(query: &str, country: &str) -> SearchRequest {
        SearchRequest::new(query, country, SortBy::BestMatch)
    }

    fn envelope(products: Value) -> Value {
        json!({ "status": "OK", "data": { "products": products } })
    }

    #[test]
    fn test_parse_offer_nested_fields() {
        let item = json!({
            "product_title": "Red Bull Energy Drink 250ml",
            "product_photos": ["https://img.example/rb1.jpg", "https://img.example/rb2.jpg"],
            "offer": {
                "price": "₹120",
                "store_name": "BigBasket",
                "offer_page_url": "https://bigbasket.example/rb"
            }
        });

        let offer = parse_offer(&item, &request("red bull", "in")).unwrap();
        assert_eq!(offer.name, "Red Bull Energy Drink 250ml");
        assert_eq!(offer.price, 120.0);
        assert_eq!(offer.currency, Currency::Inr);
        assert_eq!(offer.store, "BigBasket");
        assert_eq!(offer.link.as_deref(), Some("https://bigbasket.example/rb"));
        assert_eq!(offer.image, "https://img.example/rb1.jpg");
    }

    #[test]
    fn test_parse_offer_top_level_fallbacks() {
        let item = json!({
            "product_title": "Kindle Paperwhite",
            "product_price": "$139.99",
            "merchant": { "name": "Best Buy" },
            "offer_page_url": "https://bestbuy.example/kindle",
            "product_photo": "https://img.example/kindle.jpg"
        });

        let offer = parse_offer(&item, &request("kindle", "us")).unwrap();
        assert_eq!(offer.price, 139.99);
        assert_eq!(offer.currency, Currency::Usd);
        assert_eq!(offer.store, "Best Buy");
        assert_eq!(offer.link.as_deref(), Some("https://bestbuy.example/kindle"));
        assert_eq!(offer.image, "https://img.example/kindle.jpg");
    }

    #[test]
    fn test_parse_offer_plain_price_and_defaults() {
        let item = json!({ "product_title": "Mystery Box", "price": 15 });

        let offer = parse_offer(&item, &request("mystery box", "us")).unwrap();
        assert_eq!(offer.price, 15.0);
        assert_eq!(offer.store, "Unknown");
        assert!(offer.link.is_none());
        assert_eq!(offer.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_parse_offer_skips_empty_candidates() {
        let item = json!({
            "product_title": "Desk Lamp",
            "offer": { "price": null, "store_name": "" },
            "product_price": "",
            "price": "12.50",
            "merchant": { "name": "Lamps Inc" },
            "product_photos": []
        });

        let offer = parse_offer(&item, &request("desk lamp", "us")).unwrap();
        assert_eq!(offer.price, 12.5);
        assert_eq!(offer.store, "Lamps Inc");
        assert_eq!(offer.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_parse_offer_without_price_is_dropped() {
        let request = request("widget", "us");
        assert!(parse_offer(&json!({ "product_title": "Widget" }), &request).is_none());
        assert!(parse_offer(&json!({ "product_title": "Widget", "price": "N/A" }), &request)
            .is_none());
        assert!(parse_offer(&json!({ "product_title": "Widget", "offer": { "price": 0 } }), &request)
            .is_none());
    }

    #[test]
    fn test_parse_offer_missing_title() {
        let offer = parse_offer(&json!({ "price": 5 }), &request("anything", "us")).unwrap();
        assert_eq!(offer.name, "Unknown");
    }

    #[test]
    fn test_parse_offers_sorted_ascending() {
        let response = envelope(json!([
            { "product_title": "Sony WH-1000XM5", "offer": { "price": "$999.99" } },
            { "product_title": "Sony WH-1000XM5 Refurb", "offer": { "price": "$499.50" } }
        ]));

        let offers = parse_offers(&response, &request("sony wh-1000xm5", "us"));
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].price, 499.50);
        assert_eq!(offers[1].price, 999.99);
    }

    #[test]
    fn test_parse_offers_stable_for_equal_prices() {
        let response = envelope(json!([
            { "product_title": "Widget Alpha", "price": 10 },
            { "product_title": "Widget Beta", "price": 5 },
            { "product_title": "Widget Gamma", "price": 10 }
        ]));

        let offers = parse_offers(&response, &request("widget", "us"));
        let names: Vec<&str> = offers.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Widget Beta", "Widget Alpha", "Widget Gamma"]);
    }

    #[test]
    fn test_parse_offers_drops_zero_prices() {
        let response = envelope(json!([
            { "product_title": "Widget One", "price": "free" },
            { "product_title": "Widget Two", "price": 3 },
            { "product_title": "Widget Three" }
        ]));

        let offers = parse_offers(&response, &request("widget", "us"));
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].name, "Widget Two");
        assert!(offers.iter().all(|o| o.price > 0.0));
    }

    #[test]
    fn test_parse_offers_drops_accessories() {
        let response = envelope(json!([
            { "product_title": "Apple iPhone 15 128GB", "offer": { "price": "$799" } },
            { "product_title": "iPhone 15 Pro Case", "offer": { "price": "$19" } },
            { "product_title": "Garden Hose", "offer": { "price": "$25" } }
        ]));

        let offers = parse_offers(&response, &request("smartphone iphone 15", "us"));
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].name, "Apple iPhone 15 128GB");
    }

    #[test]
    fn test_parse_offers_keeps_untitled_items() {
        let response = envelope(json!([
            { "product_title": "", "price": 10 },
            { "product_title": null, "price": 11 },
            { "price": 12 },
            { "product_title": "Desk Lamp", "price": 9 }
        ]));

        let offers = parse_offers(&response, &request("widget", "us"));

        let prices: Vec<f64> = offers.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![10.0, 11.0, 12.0]);
        assert!(offers.iter().all(|o| o.name == "Unknown"));
    }

    #[test]
    fn test_parse_offers_missing_envelope() {
        let request = request("anything", "us");
        assert!(parse_offers(&json!({}), &request).is_empty());
        assert!(parse_offers(&json!({ "data": {} }), &request).is_empty());
        assert!(parse_offers(&json!({ "data": { "products": "oops" } }), &request).is_empty());
        assert!(parse_offers(&json!(null), &request).is_empty());
    }
}
