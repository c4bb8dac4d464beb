//! HTTP endpoint layer: routes, multipart handling, and error mapping.
//!
//! Stateless request/response — every extraction is built fresh per request
//! and discarded once the response is sent. The only shared state is the
//! immutable [`AppState`] behind an `Arc`.
//!
//! Routes:
//! * `GET  /` — health/readiness, reports whether the oracle is configured
//! * `POST /api/extract` — combined extraction, both files required
//! * `POST /api/extract/solicitor` — letter only (isolated testing)
//! * `POST /api/extract/audiogram` — audiogram only (isolated testing)
//!
//! The combined endpoint fails fast with 500 when no oracle is configured;
//! the per-document endpoints degrade to empty records instead, which is
//! what makes them useful for poking at the pipeline locally.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::ExtractError;
use crate::pipeline::extract::DocumentExtractor;
use crate::record::{AudiogramRecord, CombinedResult, SolicitorRecord};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "MNIHL Document Extraction API";

/// Upload cap, comfortably above any realistic letter or audiogram scan.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Error `detail` strings are truncated to keep response bodies bounded.
const MAX_DETAIL_CHARS: usize = 200;

/// Shared, immutable per-process state.
pub struct AppState {
    pub extractor: DocumentExtractor,
}

/// Build the service router.
///
/// CORS is permissive by design: the reviewing frontend is served from a
/// separate origin and the API carries no credentials or cookies.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/extract", post(extract_combined))
        .route("/api/extract/solicitor", post(extract_solicitor))
        .route("/api/extract/audiogram", post(extract_audiogram))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Response bodies ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    api_key_configured: bool,
    client_initialized: bool,
}

/// Error body shape: `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExtractError::MissingField { .. }
            | ExtractError::InvalidUpload(_)
            | ExtractError::UnsupportedMedia { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let detail = truncate_detail(&self.to_string());
        (status, Json(ErrorDetail { detail })).into_response()
    }
}

fn truncate_detail(message: &str) -> String {
    if message.chars().count() <= MAX_DETAIL_CHARS {
        message.to_string()
    } else {
        let truncated: String = message.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{truncated}…")
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let configured = state.extractor.is_configured();
    Json(HealthResponse {
        status: "online",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        api_key_configured: configured,
        client_initialized: configured,
    })
}

/// Combined extraction: both files, five fields, confidence map.
async fn extract_combined(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CombinedResult>, ExtractError> {
    // Hard precondition: do not accept work the oracle cannot do.
    if !state.extractor.is_configured() {
        return Err(ExtractError::OracleNotConfigured);
    }

    let mut uploads = read_uploads(multipart, &["solicitor_letter", "audiogram"]).await?;
    let letter = take_required(&mut uploads, "solicitor_letter")?;
    let audiogram = take_required(&mut uploads, "audiogram")?;

    info!(
        letter = %letter.filename,
        audiogram = %audiogram.filename,
        "combined extraction started"
    );

    // No data dependency between the two oracle calls — run them together.
    let (letter_record, audiogram_record) = tokio::join!(
        state
            .extractor
            .extract_solicitor_letter(&letter.content, &letter.filename),
        state
            .extractor
            .extract_audiogram(&audiogram.content, &audiogram.filename),
    );

    let result = CombinedResult::combine(letter_record?, audiogram_record?);
    info!(confidence = ?result.confidence, "combined extraction complete");
    Ok(Json(result))
}

/// Letter-only extraction for isolated testing; returns the bare record.
async fn extract_solicitor(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SolicitorRecord>, ExtractError> {
    let mut uploads = read_uploads(multipart, &["solicitor_letter"]).await?;
    let letter = take_required(&mut uploads, "solicitor_letter")?;
    let record = state
        .extractor
        .extract_solicitor_letter(&letter.content, &letter.filename)
        .await?;
    Ok(Json(record))
}

/// Audiogram-only extraction for isolated testing; returns the bare record.
async fn extract_audiogram(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AudiogramRecord>, ExtractError> {
    let mut uploads = read_uploads(multipart, &["audiogram"]).await?;
    let audiogram = take_required(&mut uploads, "audiogram")?;
    let record = state
        .extractor
        .extract_audiogram(&audiogram.content, &audiogram.filename)
        .await?;
    Ok(Json(record))
}

// ── Multipart plumbing ───────────────────────────────────────────────────

struct Upload {
    filename: String,
    content: Vec<u8>,
}

/// Drain the multipart stream, keeping only the named fields.
async fn read_uploads(
    mut multipart: Multipart,
    wanted: &[&'static str],
) -> Result<HashMap<&'static str, Upload>, ExtractError> {
    let mut uploads = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractError::InvalidUpload(e.to_string()))?
    {
        let Some(name) = wanted
            .iter()
            .copied()
            .find(|wanted_name| field.name() == Some(*wanted_name))
        else {
            continue;
        };
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ExtractError::InvalidUpload(e.to_string()))?
            .to_vec();
        uploads.insert(name, Upload { filename, content });
    }

    Ok(uploads)
}

fn take_required(
    uploads: &mut HashMap<&'static str, Upload>,
    field: &'static str,
) -> Result<Upload, ExtractError> {
    uploads
        .remove(field)
        .ok_or(ExtractError::MissingField { field })
}
