//! Production oracle client speaking the Anthropic Messages API.
//!
//! One `reqwest` client is built per oracle instance with a request
//! timeout, then shared across requests — connection pooling comes for
//! free. Errors are mapped into the crate taxonomy at the transport
//! boundary so callers never see `reqwest` types.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{ContentBlock, Oracle, OraclePayload};

/// Messages API revision this client speaks.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API.
///
/// Constructed once at startup and injected into
/// [`crate::pipeline::extract::DocumentExtractor`]; there is deliberately
/// no process-global instance.
pub struct AnthropicOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl AnthropicOracle {
    /// Build a client from an API key and the shared config.
    pub fn new(api_key: impl Into<String>, config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ExtractError::OracleTransport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            timeout_secs: config.api_timeout_secs,
        })
    }

    /// The model identifier this client sends.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage; 1],
}

#[derive(Serialize)]
struct UserMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ReplyBlock>,
}

#[derive(Deserialize)]
struct ReplyBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn invoke(&self, payload: OraclePayload) -> Result<String, ExtractError> {
        let start = Instant::now();
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: payload.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: payload.content,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::OracleTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ExtractError::OracleTransport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The API wraps errors in {"error": {"message": ...}}; fall back
            // to the raw body when it does not.
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(ExtractError::OracleApi {
                status: status.as_u16(),
                message,
            });
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::OracleTransport(e.to_string()))?;

        let text = reply
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            reply_len = text.len(),
            "oracle reply received"
        );

        Ok(text)
    }
}
