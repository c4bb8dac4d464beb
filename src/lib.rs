//! # mnihl-extract
//!
//! Extract the five key fields an MNIHL (military noise-induced hearing
//! loss) report needs — solicitor reference, claimant name, address, date
//! of birth, and audiogram test date — from a solicitor's letter and an
//! audiogram, by delegating document understanding to a multimodal LLM.
//!
//! ## Why this crate?
//!
//! The hard problem (reading scanned legal letters and hearing-test charts)
//! is delegated entirely to an external model. What this crate owns is the
//! unglamorous part that still has to be exactly right: shaping a
//! model-appropriate payload per file type, prompting for a strict JSON
//! contract, repairing and parsing an uncertain free-text reply, and
//! normalising date formats — always answering with a complete, typed
//! record and per-field confidence flags rather than failing a whole
//! request over one bad field.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (multipart)
//!  │
//!  ├─ 1. Payload  classify by extension → document/image/text blocks + prompt
//!  ├─ 2. Oracle   one Messages API call per document (the only network I/O)
//!  ├─ 3. Parse    strip fences, strict JSON parse, degrade-to-empty
//!  ├─ 4. Dates    repair year width (DD/MM/YYYY ↔ DD/MM/YY)
//!  └─ 5. Combine  five ordered fields + non-emptiness confidence map
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mnihl_extract::{
//!     router, AnthropicOracle, AppState, DocumentExtractor, ExtractionConfig, Oracle,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let key = std::env::var("ANTHROPIC_API_KEY")?;
//!     let oracle: Arc<dyn Oracle> = Arc::new(AnthropicOracle::new(key, &config)?);
//!
//!     let state = Arc::new(AppState {
//!         extractor: DocumentExtractor::new(Some(oracle), config),
//!     });
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Degradation model
//!
//! A field the oracle cannot find, a reply that is not JSON, or a missing
//! API key on the debug endpoints all come back as empty strings with
//! `false` confidence — the service is an assistant to a human reviewer,
//! not an authoritative source, so "always answer, flag low confidence"
//! beats "fail the request". Only bad configuration at the combined
//! endpoint, malformed uploads, and oracle transport faults surface as
//! HTTP errors.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dates;
pub mod error;
pub mod oracle;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use dates::DateFormat;
pub use error::ExtractError;
pub use oracle::{AnthropicOracle, ContentBlock, Oracle, OraclePayload};
pub use pipeline::extract::DocumentExtractor;
pub use record::{AudiogramRecord, CombinedResult, FieldConfidence, SolicitorRecord};
pub use server::{router, AppState};
