//! Extraction orchestration: build payload → invoke oracle → parse →
//! normalise dates.
//!
//! This module is intentionally thin — prompt engineering lives in
//! [`crate::prompts`], wire shaping in [`payload`](crate::pipeline::payload),
//! and reply repair in [`parse`](crate::pipeline::parse), so it can each be
//! changed without touching the orchestration here.
//!
//! ## Missing-oracle behaviour
//!
//! The extractor holds `Option<Arc<dyn Oracle>>`. With no oracle, both
//! operations return all-empty records and log a `warn` — the service stays
//! up in degraded mode for local development and the debug endpoints. The
//! combined HTTP endpoint layers its own fail-fast check on top (see
//! [`crate::server`]).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::dates::{self, DateFormat};
use crate::error::ExtractError;
use crate::oracle::Oracle;
use crate::pipeline::{parse, payload};
use crate::record::{AudiogramRecord, SolicitorRecord};

/// Stateless per-document extraction service.
///
/// Cheap to share: handlers hold it behind one `Arc` for the process
/// lifetime. No mutable state survives a call.
pub struct DocumentExtractor {
    oracle: Option<Arc<dyn Oracle>>,
    config: ExtractionConfig,
}

impl DocumentExtractor {
    /// Create an extractor. Pass `None` for the oracle to run in degraded
    /// (all-empty-records) mode.
    pub fn new(oracle: Option<Arc<dyn Oracle>>, config: ExtractionConfig) -> Self {
        Self { oracle, config }
    }

    /// Whether an oracle client is available.
    pub fn is_configured(&self) -> bool {
        self.oracle.is_some()
    }

    /// Extract the four solicitor-letter fields.
    ///
    /// Date of birth is normalised to `DD/MM/YYYY`. Oracle transport
    /// failures propagate; an unparseable reply degrades to an all-empty
    /// record instead.
    pub async fn extract_solicitor_letter(
        &self,
        content: &[u8],
        filename: &str,
    ) -> Result<SolicitorRecord, ExtractError> {
        let Some(oracle) = &self.oracle else {
            warn!(filename, "oracle not configured, returning empty solicitor record");
            return Ok(SolicitorRecord::default());
        };

        let payload = payload::solicitor_letter(content, filename, self.config.letter_max_tokens);
        let start = Instant::now();
        let reply = oracle.invoke(payload).await?;
        debug!(
            filename,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "solicitor letter extraction reply received"
        );

        let fields = parse::parse_fields(&reply, &SolicitorRecord::FIELDS);
        let mut record = SolicitorRecord::from_fields(&fields);
        record.dob = dates::normalise(&record.dob, DateFormat::FourDigitYear);
        Ok(record)
    }

    /// Extract the audiogram test date.
    ///
    /// Fails fast with [`ExtractError::UnsupportedMedia`] before any oracle
    /// spend when the extension is unrecognised. The date is normalised to
    /// `DD/MM/YY`.
    pub async fn extract_audiogram(
        &self,
        content: &[u8],
        filename: &str,
    ) -> Result<AudiogramRecord, ExtractError> {
        let payload = payload::audiogram(content, filename, self.config.audiogram_max_tokens)?;

        let Some(oracle) = &self.oracle else {
            warn!(filename, "oracle not configured, returning empty audiogram record");
            return Ok(AudiogramRecord::default());
        };

        let start = Instant::now();
        let reply = oracle.invoke(payload).await?;
        debug!(
            filename,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "audiogram extraction reply received"
        );

        let fields = parse::parse_fields(&reply, &AudiogramRecord::FIELDS);
        let mut record = AudiogramRecord::from_fields(&fields);
        record.audiogram_date = dates::normalise(&record.audiogram_date, DateFormat::TwoDigitYear);
        Ok(record)
    }
}
