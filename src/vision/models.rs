//! Identification requests and the Messages API wire format.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Image media types accepted by the vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MediaType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
    #[default]
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MediaType {
    /// Infers the media type from a file extension; anything unknown is sent as JPEG.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => MediaType::Png,
            Some("webp") => MediaType::Webp,
            _ => MediaType::Jpeg,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw image bytes plus their declared media type, built per call.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentificationRequest {
    pub image: Vec<u8>,
    pub media_type: MediaType,
}

impl IdentificationRequest {
    pub fn new(image: Vec<u8>, media_type: MediaType) -> Self {
        Self { image, media_type }
    }

    /// Reads an image file, inferring the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let image = std::fs::read(path)?;
        Ok(Self::new(image, MediaType::from_path(path)))
    }

    /// Base64 payload for the API.
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.image)
    }
}

impl fmt::Debug for IdentificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentificationRequest")
            .field("bytes", &self.image.len())
            .field("media_type", &self.media_type)
            .finish()
    }
}

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media_type: MediaType,
    pub data: String,
}

impl MessagesRequest {
    /// Single user turn: the image first, then the instruction text.
    pub fn single_turn(
        model: impl Into<String>,
        max_tokens: u32,
        request: &IdentificationRequest,
        prompt: &str,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: request.media_type,
                            data: request.encoded(),
                        },
                    },
                    ContentBlock::Text { text: prompt.to_string() },
                ],
            }],
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// Text of the first text block, trimmed. `None` when there is no usable text.
    pub fn first_text(&self) -> Option<String> {
        self.content
            .iter()
            .find_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.trim()),
                ResponseBlock::Other => None,
            })
            .filter(|t| !t.is_empty())
            .map(String::from)
    }
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}
