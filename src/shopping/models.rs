//! Data models for shopping offers, currencies and sort directives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency attached to a normalized offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Inr,
}

impl Currency {
    /// Picks the currency for a search country.
    ///
    /// This is not a real currency lookup: India gets rupees, every other market is
    /// reported in dollars.
    pub fn for_country(country: &str) -> Self {
        // Case-insensitive on purpose: "IN" from a config file is still India.
        if country.eq_ignore_ascii_case("in") {
            Currency::Inr
        } else {
            Currency::Usd
        }
    }

    /// ISO code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sort directive forwarded to the shopping-search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    #[default]
    BestMatch,
    LowestPrice,
    HighestPrice,
    TopRated,
    Latest,
}

impl SortBy {
    /// Value sent as the `sort_by` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::BestMatch => "BEST_MATCH",
            SortBy::LowestPrice => "LOWEST_PRICE",
            SortBy::HighestPrice => "HIGHEST_PRICE",
            SortBy::TopRated => "TOP_RATED",
            SortBy::Latest => "LATEST",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "best_match" | "best" => Ok(SortBy::BestMatch),
            "lowest_price" | "cheapest" => Ok(SortBy::LowestPrice),
            "highest_price" => Ok(SortBy::HighestPrice),
            "top_rated" => Ok(SortBy::TopRated),
            "latest" => Ok(SortBy::Latest),
            _ => Err(format!(
                "Unknown sort: {}. Use: best_match, lowest_price, highest_price, top_rated, latest",
                s
            )),
        }
    }
}

/// A single merchant listing after normalization.
///
/// `price` is always finite and strictly positive: offers without an extractable
/// price never make it into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOffer {
    /// Product title as listed by the merchant
    pub name: String,
    /// Offer price
    pub price: f64,
    /// Currency of `price`
    pub currency: Currency,
    /// Merchant/store name
    pub store: String,
    /// Offer page URL, when the API provides one
    pub link: Option<String>,
    /// Product image URL (placeholder when the API has none)
    pub image: String,
}

impl NormalizedOffer {
    /// Price with currency symbol, thousands separators and two decimals.
    pub fn display_price(&self) -> String {
        format!("{}{}", self.currency.symbol(), group_thousands(self.price))
    }
}

/// Formats `value` with two decimals and comma thousands separators.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}.{}", grouped, frac_part)
}

/// Parameters for one shopping-search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Lower-cased market code (us, in, uk, ...)
    pub country: String,
    pub sort_by: SortBy,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, country: impl AsRef<str>, sort_by: SortBy) -> Self {
        Self {
            query: query.into(),
            country: country.as_ref().trim().to_lowercase(),
            sort_by,
        }
    }

    /// Currency reported for offers from this market.
    pub fn currency(&self) -> Currency {
        Currency::for_country(&self.country)
    }
}
