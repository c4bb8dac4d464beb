//! End-to-end tests for the HTTP surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` and the
//! oracle is replaced by deterministic stubs, so the full multipart →
//! payload → parse → normalise → respond pipeline runs without a network.
//! The stubs pick their reply by inspecting which instruction text the
//! payload carries, which also proves the combined endpoint routes the
//! letter prompt and the audiogram prompt to the right call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use mnihl_extract::{
    router, AppState, ContentBlock, DocumentExtractor, ExtractError, ExtractionConfig, Oracle,
    OraclePayload,
};
use tower::ServiceExt;

// ── Test doubles ─────────────────────────────────────────────────────────

fn is_audiogram_payload(payload: &OraclePayload) -> bool {
    payload.content.iter().any(|block| {
        matches!(block, ContentBlock::Text { text } if text.contains("audiogram test date"))
    })
}

/// Replies with a per-document canned string, chosen by prompt inspection.
struct StubOracle {
    letter_reply: String,
    audiogram_reply: String,
}

impl StubOracle {
    fn new(letter_reply: &str, audiogram_reply: &str) -> Arc<Self> {
        Arc::new(Self {
            letter_reply: letter_reply.to_string(),
            audiogram_reply: audiogram_reply.to_string(),
        })
    }
}

#[async_trait]
impl Oracle for StubOracle {
    async fn invoke(&self, payload: OraclePayload) -> Result<String, ExtractError> {
        Ok(if is_audiogram_payload(&payload) {
            self.audiogram_reply.clone()
        } else {
            self.letter_reply.clone()
        })
    }
}

/// Always fails at the transport layer.
struct DownOracle;

#[async_trait]
impl Oracle for DownOracle {
    async fn invoke(&self, _payload: OraclePayload) -> Result<String, ExtractError> {
        Err(ExtractError::OracleTransport("connection refused".into()))
    }
}

/// Records every payload it is invoked with.
#[derive(Default)]
struct RecordingOracle {
    seen: Mutex<Vec<OraclePayload>>,
}

#[async_trait]
impl Oracle for RecordingOracle {
    async fn invoke(&self, payload: OraclePayload) -> Result<String, ExtractError> {
        let reply = if is_audiogram_payload(&payload) {
            r#"{"audiogram_date":"24/08/25"}"#
        } else {
            r#"{"name":"Recorded"}"#
        };
        self.seen.lock().unwrap().push(payload);
        Ok(reply.to_string())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn app_with(oracle: Option<Arc<dyn Oracle>>) -> Router {
    router(Arc::new(AppState {
        extractor: DocumentExtractor::new(oracle, ExtractionConfig::default()),
    }))
}

const BOUNDARY: &str = "mnihl-test-boundary-7cf0b1";

fn multipart_request(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body reads")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

const LETTER_REPLY: &str = r#"{"solicitor_ref":"806964.001/CGN/CD","name":"John William Landels Porter","address":"59 Sandleford Lane, Greenham, Thatcham, RG198XQ","dob":"10/03/1978"}"#;
const AUDIOGRAM_REPLY: &str = r#"{"audiogram_date":"24/08/25"}"#;

// ── Health endpoint ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_configured_oracle() {
    let app = app_with(Some(StubOracle::new("{}", "{}")));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["service"], "MNIHL Document Extraction API");
    assert_eq!(body["api_key_configured"], true);
    assert_eq!(body["client_initialized"], true);
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn health_reports_missing_oracle() {
    let app = app_with(None);
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["api_key_configured"], false);
    assert_eq!(body["client_initialized"], false);
}

// ── Combined extraction ──────────────────────────────────────────────────

#[tokio::test]
async fn combined_extraction_happy_path() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF-1.4 letter"),
            ("audiogram", "chart.png", b"\x89PNG chart"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["solicitor_ref"], "806964.001/CGN/CD");
    assert_eq!(body["name"], "John William Landels Porter");
    assert_eq!(
        body["address"],
        "59 Sandleford Lane, Greenham, Thatcham, RG198XQ"
    );
    assert_eq!(body["dob"], "10/03/1978");
    assert_eq!(body["audiogram_date"], "24/08/25");
    for key in ["solicitor_ref", "name", "address", "dob", "audiogram_date"] {
        assert_eq!(body["confidence"][key], true, "confidence for {key}");
    }
}

#[tokio::test]
async fn combined_normalises_year_widths() {
    // dob comes back with a two-digit year, audiogram date with four.
    let app = app_with(Some(StubOracle::new(
        r#"{"solicitor_ref":"R/1","name":"A","address":"B","dob":"10/03/78"}"#,
        r#"{"audiogram_date":"24/08/2025"}"#,
    )));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.jpg", b"jpeg"),
        ],
    );
    let body = json_body(app.oneshot(request).await.expect("response")).await;
    assert_eq!(body["dob"], "10/03/1978");
    assert_eq!(body["audiogram_date"], "24/08/25");
}

#[tokio::test]
async fn combined_without_oracle_returns_500() {
    let app = app_with(None);
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.png", b"png"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    let detail = body["detail"].as_str().expect("detail present");
    assert!(detail.contains("ANTHROPIC_API_KEY"), "got: {detail}");
}

#[tokio::test]
async fn combined_missing_audiogram_field_returns_400() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract",
        &[("solicitor_letter", "letter.pdf", b"%PDF")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail present")
        .contains("audiogram"));
}

#[tokio::test]
async fn combined_gif_audiogram_returns_400() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.gif", b"GIF89a"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail present")
        .contains("gif"));
}

#[tokio::test]
async fn combined_degrades_on_malformed_reply() {
    // Neither reply is JSON; the request still answers 200 with the full
    // key set, all empty, confidence all false.
    let app = app_with(Some(StubOracle::new(
        "I am unable to read this document.",
        "no date found",
    )));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.png", b"png"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    for key in ["solicitor_ref", "name", "address", "dob", "audiogram_date"] {
        assert_eq!(body[key], "", "field {key} must be empty");
        assert_eq!(body["confidence"][key], false, "confidence for {key}");
    }
}

#[tokio::test]
async fn combined_fenced_replies_parse_like_bare_ones() {
    let app = app_with(Some(StubOracle::new(
        &format!("```json\n{LETTER_REPLY}\n```"),
        &format!("```\n{AUDIOGRAM_REPLY}\n```"),
    )));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.png", b"png"),
        ],
    );
    let body = json_body(app.oneshot(request).await.expect("response")).await;
    assert_eq!(body["solicitor_ref"], "806964.001/CGN/CD");
    assert_eq!(body["audiogram_date"], "24/08/25");
}

#[tokio::test]
async fn combined_oracle_transport_error_returns_500() {
    let app = app_with(Some(Arc::new(DownOracle)));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.png", b"png"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail present")
        .contains("connection refused"));
}

#[tokio::test]
async fn combined_sends_correct_block_types() {
    let oracle = Arc::new(RecordingOracle::default());
    let app = app_with(Some(oracle.clone()));
    let request = multipart_request(
        "/api/extract",
        &[
            ("solicitor_letter", "letter.pdf", b"%PDF"),
            ("audiogram", "chart.png", b"png"),
        ],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let seen = oracle.seen.lock().expect("lock");
    assert_eq!(seen.len(), 2, "one oracle call per document");

    let letter = seen
        .iter()
        .find(|p| !is_audiogram_payload(p))
        .expect("letter payload sent");
    assert!(matches!(&letter.content[0], ContentBlock::Document { source }
        if source.media_type == "application/pdf"));
    assert_eq!(letter.max_tokens, 1000);

    let audiogram = seen
        .iter()
        .find(|p| is_audiogram_payload(p))
        .expect("audiogram payload sent");
    assert!(matches!(&audiogram.content[0], ContentBlock::Image { source }
        if source.media_type == "image/png"));
    assert_eq!(audiogram.max_tokens, 500);
}

// ── Per-document debug endpoints ─────────────────────────────────────────

#[tokio::test]
async fn solicitor_endpoint_returns_bare_record() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract/solicitor",
        &[("solicitor_letter", "letter.pdf", b"%PDF")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["solicitor_ref"], "806964.001/CGN/CD");
    assert_eq!(body["dob"], "10/03/1978");
    assert!(
        body.get("confidence").is_none(),
        "no confidence wrapper on the debug endpoint"
    );
    assert!(body.get("audiogram_date").is_none());
}

#[tokio::test]
async fn audiogram_endpoint_returns_bare_record() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract/audiogram",
        &[("audiogram", "chart.jpeg", b"jpeg")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["audiogram_date"], "24/08/25");
    assert!(body.get("confidence").is_none());
}

#[tokio::test]
async fn solicitor_endpoint_degrades_without_oracle() {
    // Unlike /api/extract, the debug endpoints stay usable with no key.
    let app = app_with(None);
    let request = multipart_request(
        "/api/extract/solicitor",
        &[("solicitor_letter", "letter.pdf", b"%PDF")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    for key in ["solicitor_ref", "name", "address", "dob"] {
        assert_eq!(body[key], "", "field {key} must be empty");
    }
}

#[tokio::test]
async fn audiogram_endpoint_rejects_gif() {
    let app = app_with(Some(StubOracle::new(LETTER_REPLY, AUDIOGRAM_REPLY)));
    let request = multipart_request(
        "/api/extract/audiogram",
        &[("audiogram", "chart.gif", b"GIF89a")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn text_letter_is_embedded_not_attached() {
    let oracle = Arc::new(RecordingOracle::default());
    let app = app_with(Some(oracle.clone()));
    let request = multipart_request(
        "/api/extract/solicitor",
        &[("solicitor_letter", "letter.txt", b"Dear Sirs, ref 1/AB")],
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let seen = oracle.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].content.len(), 1, "single text block, no attachment");
    assert!(matches!(&seen[0].content[0], ContentBlock::Text { text }
        if text.contains("Document content:\nDear Sirs, ref 1/AB")));
}
