//! Error types for the configuration, vision and shopping-search seams.

use thiserror::Error;

/// Configuration error raised while wiring up clients at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required API credential is absent from both the config file and the environment.
    #[error("missing {name}: set {env} or add it to the config file")]
    MissingCredential {
        name: &'static str,
        env: &'static str,
    },

    /// The HTTP client could not be built (bad proxy URL, TLS setup failure).
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] wreq::Error),
}

/// Failure talking to the vision model.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Network-level failure before a response arrived.
    #[error("vision request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// The configured model does not exist or the key has no access to it.
    #[error("model '{model}' not found; the API key may not have access to it yet, or the account may need credits")]
    ModelNotFound { model: String },

    /// The API rejected the request as malformed.
    #[error("vision API rejected the request: {0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("vision API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON shape.
    #[error("malformed vision response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The model answered without any text.
    #[error("vision model returned no text")]
    EmptyResponse,
}

/// Failure talking to the shopping-search API.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Network-level failure before a response arrived.
    #[error("search request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// Non-success status from the search API.
    #[error("search API returned status {status}")]
    Status { status: u16 },

    /// The response body was not valid JSON.
    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}
