//! HTTP client for the multimodal identification model.

use crate::config::Config;
use crate::error::{ConfigError, VisionError};
use crate::vision::models::{ErrorResponse, IdentificationRequest, MessagesRequest, MessagesResponse};
use crate::vision::prompt;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};
use wreq::Client;

const API_VERSION: &str = "2023-06-01";

/// Trait for product identification - enables mocking for tests.
#[async_trait]
pub trait ProductIdentifier: Send + Sync {
    /// Asks the model for a shopping query describing the pictured product.
    async fn identify(&self, request: &IdentificationRequest) -> Result<String, VisionError>;
}

/// Messages API client.
pub struct VisionClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl VisionClient {
    /// Creates a client from configuration. Fails when the API key is missing.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.vision_api_key()?;

        let mut builder = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: api_key.to_string(),
            model: config.vision.model.clone(),
            max_tokens: config.vision.max_tokens,
            base_url: config.vision.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured model id.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Maps a non-success response to a typed error.
    fn status_error(&self, status: u16, body: &str) -> VisionError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            404 => VisionError::ModelNotFound { model: self.model.clone() },
            400 => VisionError::BadRequest(message),
            _ => VisionError::Status { status, message },
        }
    }
}

#[async_trait]
impl ProductIdentifier for VisionClient {
    async fn identify(&self, request: &IdentificationRequest) -> Result<String, VisionError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest::single_turn(&self.model, self.max_tokens, request, prompt::CURRENT);

        debug!("POST {} ({} image bytes, {})", url, request.image.len(), request.media_type);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .body(serde_json::to_string(&body)?)
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        let text = response.text().await?;
        if !status.is_success() {
            return Err(self.status_error(status.as_u16(), &text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        parsed.first_text().ok_or(VisionError::EmptyResponse)
    }
}

/// Identifies the pictured product, returning the search query.
///
/// Every failure is logged with a readable diagnostic and yields `None`; there is no
/// retry and no fallback model.
pub async fn identify(
    identifier: &dyn ProductIdentifier,
    request: &IdentificationRequest,
) -> Option<String> {
    match identifier.identify(request).await {
        Ok(query) => {
            info!("Identified product: {}", query);
            Some(query)
        }
        Err(e) => {
            error!("Identification failed: {}", e);
            None
        }
    }
}
