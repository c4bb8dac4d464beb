//! Payload building: uploaded bytes + filename → oracle request blocks.
//!
//! Media dispatch is by file extension only. The bytes are never sniffed
//! or validated locally — the oracle sees the document exactly as uploaded
//! and is the judge of whether it is readable. A wrong extension therefore
//! surfaces as an oracle error, not a local one; the only local rejection
//! is an audiogram extension the API has no block type for.

use crate::error::ExtractError;
use crate::oracle::{ContentBlock, OraclePayload};
use crate::prompts;

/// Media types the oracle accepts as binary blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Jpeg,
    Png,
}

impl MediaType {
    /// Classify a filename by extension. `None` for anything unrecognised,
    /// including filenames with no extension at all.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// The MIME string sent on the wire.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// PDFs travel as `document` blocks, rasters as `image` blocks.
    fn block(self, content: &[u8]) -> ContentBlock {
        match self {
            Self::Pdf => ContentBlock::document(self.mime(), content),
            Self::Jpeg | Self::Png => ContentBlock::image(self.mime(), content),
        }
    }
}

/// Build the oracle payload for a solicitor letter.
///
/// PDFs and images attach as binary blocks with the instruction text
/// appended. Anything else is treated as a plain-text letter: the bytes
/// are decoded lossily (invalid UTF-8 replaced, never an error) and
/// embedded in the instruction prompt itself.
pub fn solicitor_letter(content: &[u8], filename: &str, max_tokens: u32) -> OraclePayload {
    let blocks = match MediaType::from_filename(filename) {
        Some(media) => vec![
            media.block(content),
            ContentBlock::text(prompts::SOLICITOR_LETTER),
        ],
        None => {
            let text = String::from_utf8_lossy(content);
            vec![ContentBlock::text(prompts::solicitor_letter_text(&text))]
        }
    };
    OraclePayload {
        content: blocks,
        max_tokens,
    }
}

/// Build the oracle payload for an audiogram.
///
/// Audiograms are charts; there is no text fallback. An unrecognised
/// extension fails fast before any oracle spend.
pub fn audiogram(
    content: &[u8],
    filename: &str,
    max_tokens: u32,
) -> Result<OraclePayload, ExtractError> {
    let media =
        MediaType::from_filename(filename).ok_or_else(|| ExtractError::UnsupportedMedia {
            extension: filename
                .rsplit_once('.')
                .map(|(_, extension)| extension.to_ascii_lowercase())
                .unwrap_or_else(|| filename.to_string()),
        })?;

    Ok(OraclePayload {
        content: vec![media.block(content), ContentBlock::text(prompts::AUDIOGRAM)],
        max_tokens,
    })
}
