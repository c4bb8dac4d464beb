//! The oracle seam: the one interface behind which the external multimodal
//! model lives.
//!
//! Everything the service knows about the model is `invoke(payload) ->
//! text`. Keeping the seam this narrow is what makes the rest of the crate
//! testable: integration tests substitute a deterministic stub and exercise
//! the full payload-build → parse → normalise pipeline without a network.
//!
//! The payload types here mirror the multimodal content-block shape the
//! Messages API accepts (`document` / `image` / `text` blocks, binary
//! sources base64-encoded). They serialise directly into the request body.

pub mod anthropic;

pub use anthropic::AnthropicOracle;

use crate::error::ExtractError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// A base64-encoded binary source for a document or image block.
#[derive(Debug, Clone, Serialize)]
pub struct Base64Source {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media_type: &'static str,
    pub data: String,
}

impl Base64Source {
    pub fn new(media_type: &'static str, content: &[u8]) -> Self {
        Self {
            kind: "base64",
            media_type,
            data: STANDARD.encode(content),
        }
    }
}

/// One content block of a multimodal oracle message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// A PDF attached whole; the oracle reads it page by page.
    Document { source: Base64Source },
    /// A raster image (JPEG or PNG).
    Image { source: Base64Source },
    /// Plain instruction or document text.
    Text { text: String },
}

impl ContentBlock {
    pub fn document(media_type: &'static str, content: &[u8]) -> Self {
        Self::Document {
            source: Base64Source::new(media_type, content),
        }
    }

    pub fn image(media_type: &'static str, content: &[u8]) -> Self {
        Self::Image {
            source: Base64Source::new(media_type, content),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// A fully assembled oracle request: content blocks plus the reply budget.
#[derive(Debug, Clone)]
pub struct OraclePayload {
    /// Blocks in send order — the document/image first, instructions last.
    pub content: Vec<ContentBlock>,
    /// Maximum tokens the oracle may spend on its reply.
    pub max_tokens: u32,
}

/// The external document-understanding model, reduced to one call.
///
/// Implementations own transport, authentication, and vendor specifics.
/// The returned string is the model's raw reply text, unparsed — reply
/// interpretation belongs to [`crate::pipeline::parse`].
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn invoke(&self, payload: OraclePayload) -> Result<String, ExtractError>;
}
