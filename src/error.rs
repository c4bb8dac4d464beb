//! Error types for the mnihl-extract library.
//!
//! One enum covers every fatal failure. Non-fatal conditions — the oracle
//! replying with something that is not JSON, or a field the oracle could not
//! find — are deliberately *not* errors: they degrade to empty-string fields
//! so one misbehaving reply never sinks a whole request (see
//! [`crate::pipeline::parse`]).
//!
//! The split that matters to HTTP callers is caller-mistake vs. service
//! fault: upload problems (`MissingField`, `InvalidUpload`,
//! `UnsupportedMedia`) map to 400, everything else to 500. That mapping
//! lives in [`crate::server`], keeping this module transport-free.

use thiserror::Error;

/// All fatal errors returned by the mnihl-extract library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Configuration errors ─────────────────────────────────────────────
    /// The oracle credential was missing at startup and a hard-precondition
    /// path (the combined endpoint) was hit.
    #[error("Oracle API key is not configured.\nSet ANTHROPIC_API_KEY and restart the service.")]
    OracleNotConfigured,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upload errors ────────────────────────────────────────────────────
    /// A required multipart field was absent from the request.
    #[error("Missing required upload field '{field}'")]
    MissingField { field: &'static str },

    /// The multipart stream could not be read to completion.
    #[error("Failed to read uploaded file: {0}")]
    InvalidUpload(String),

    /// Audiogram file extension is not one the oracle can be sent.
    #[error("Unsupported audiogram file type: '{extension}'\nSupported: pdf, jpg, jpeg, png.")]
    UnsupportedMedia { extension: String },

    // ── Oracle errors ────────────────────────────────────────────────────
    /// The oracle API returned a non-2xx status.
    #[error("Oracle API error (HTTP {status}): {message}")]
    OracleApi { status: u16, message: String },

    /// The oracle call failed below the HTTP layer (DNS, TLS, connect).
    #[error("Oracle call failed: {0}")]
    OracleTransport(String),

    /// The oracle call exceeded the client-side timeout.
    #[error("Oracle call timed out after {secs}s")]
    OracleTimeout { secs: u64 },
}
