//! Identification stage: turns a product photo into a shopping query.

pub mod client;
pub mod models;
pub mod prompt;

pub use client::{identify, ProductIdentifier, VisionClient};
pub use models::{IdentificationRequest, MediaType};
