//! Versioned instruction templates sent alongside the product photo.
//!
//! The wording shapes the model's output format, so changes get a new version
//! rather than an in-place edit.

/// First production prompt: one line, brand + model + size, no preamble.
pub const PROMPT_V1: &str = "Identify the primary product in this image for a shopping search. \
Name its category, brand, precise model name and key specs such as size or volume if visible. \
Ignore generic marketing fluff (like 'New', 'Best Value'), accessories and packaging. \
Return ONLY the raw search query string. No preamble. \
Example output: Red Bull Energy Drink 250ml";

/// Template used by the identification client.
pub const CURRENT: &str = PROMPT_V1;
