//! QR code rendering and reading
//!
//! [`QrRenderer`] turns a payload string into a PNG following the layout of
//! the common browser QR libraries (fixed pixel width, margin counted in
//! modules). [`QrDecoder`] reads a rendered code back, which the `inspect`
//! command and the tests use to check what an artifact actually encodes.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::{MAX_IMAGE_SIZE, QrRenderer, Rgba};

use crate::content::ContentType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered QR code for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrArtifact {
    /// Content type that produced the payload
    pub content_type: ContentType,
    /// The encoded string
    pub payload: String,
    /// PNG-encoded image
    pub png: Bytes,
    /// Image width (and height) in pixels
    pub width: u32,
    /// When the artifact was rendered
    pub created_at: DateTime<Utc>,
}

impl QrArtifact {
    /// `data:image/png;base64,...` form for embedding
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Contents read from a QR code image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedQr {
    /// Raw decoded bytes
    pub data: Vec<u8>,
    /// String form if valid UTF-8
    pub text: Option<String>,
}

impl DecodedQr {
    /// Wrap decoded bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Decoded string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
