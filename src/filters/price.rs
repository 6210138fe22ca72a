//! Price normalization and price range filter.

use super::Filter;
use crate::shopping::NormalizedOffer;
use serde_json::Value;

/// Converts a raw price value from the search API into a number.
///
/// Numbers are taken as-is. Strings keep only their ASCII digits and decimal points
/// before parsing, so `"₹1,299.00"` becomes `1299.0`. Anything else, an empty or
/// unparsable string, or a missing value yields `0.0`, which callers treat as
/// "price unknown". Negative and non-finite numbers also collapse to `0.0`.
pub fn normalize_price(raw: Option<&Value>) -> f64 {
    let price = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let cleaned: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };

    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// Filters offers by price range.
pub struct PriceFilter {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, offer: &NormalizedOffer) -> bool {
        if let Some(min) = self.min {
            if offer.price < min {
                return false;
            }
        }

        if let Some(max) = self.max {
            if offer.price > max {
                return false;
            }
        }

        true
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Price: {:.2} - {:.2}", min, max),
            (Some(min), None) => format!("Price: >= {:.2}", min),
            (None, Some(max)) => format!("Price: <= {:.2}", max),
            (None, None) => "Price: any".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::Currency;
    use serde_json::json;

    fn make_offer(price: f64) -> NormalizedOffer {
        NormalizedOffer {
            name: "Test".to_string(),
            price,
            currency: Currency::Usd,
            store: "Store".to_string(),
            link: None,
            image: String::new(),
        }
    }

    #[test]
    fn test_normalize_rupee_string() {
        assert_eq!(normalize_price(Some(&json!("₹1,299.00"))), 1299.00);
    }

    #[test]
    fn test_normalize_missing_and_null() {
        assert_eq!(normalize_price(None), 0.0);
        assert_eq!(normalize_price(Some(&Value::Null)), 0.0);
    }

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(normalize_price(Some(&json!(42))), 42.0);
        assert_eq!(normalize_price(Some(&json!(19.99))), 19.99);
        assert_eq!(normalize_price(Some(&json!(-5))), 0.0);
    }

    #[test]
    fn test_normalize_unparsable_strings() {
        assert_eq!(normalize_price(Some(&json!("abc"))), 0.0);
        assert_eq!(normalize_price(Some(&json!(""))), 0.0);
        assert_eq!(normalize_price(Some(&json!("1.2.3"))), 0.0);
        assert_eq!(normalize_price(Some(&json!("Free"))), 0.0);
    }

    #[test]
    fn test_normalize_trailing_text() {
        assert_eq!(normalize_price(Some(&json!("$10"))), 10.0);
        assert_eq!(normalize_price(Some(&json!("$24.99 used"))), 24.99);
        assert_eq!(normalize_price(Some(&json!("US$ 1,049"))), 1049.0);
    }

    #[test]
    fn test_normalize_other_types() {
        assert_eq!(normalize_price(Some(&json!(true))), 0.0);
        assert_eq!(normalize_price(Some(&json!([12.0]))), 0.0);
        assert_eq!(normalize_price(Some(&json!({"value": 12.0}))), 0.0);
    }

    #[test]
    fn test_price_range() {
        let filter = PriceFilter::new(Some(10.0), Some(50.0));

        assert!(!filter.matches(&make_offer(5.0)));
        assert!(filter.matches(&make_offer(10.0)));
        assert!(filter.matches(&make_offer(30.0)));
        assert!(filter.matches(&make_offer(50.0)));
        assert!(!filter.matches(&make_offer(50.01)));
    }

    #[test]
    fn test_open_bounds() {
        let filter = PriceFilter::new(Some(20.0), None);
        assert!(!filter.matches(&make_offer(10.0)));
        assert!(filter.matches(&make_offer(1000.0)));

        let filter = PriceFilter::new(None, Some(20.0));
        assert!(filter.matches(&make_offer(10.0)));
        assert!(!filter.matches(&make_offer(1000.0)));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(PriceFilter::new(Some(10.0), Some(50.0)).description(), "Price: 10.00 - 50.00");
        assert_eq!(PriceFilter::new(Some(20.0), None).description(), "Price: >= 20.00");
        assert_eq!(PriceFilter::new(None, Some(5.0)).description(), "Price: <= 5.00");
        assert_eq!(PriceFilter::new(None, None).description(), "Price: any");
    }
}
