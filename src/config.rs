//! Configuration for document extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share across handlers, serialise for logging,
//! and diff two deployments to understand why their outputs differ.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::pipeline::extract::DocumentExtractor`].
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use mnihl_extract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("claude-sonnet-4-20250514")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Oracle model identifier. Default: `claude-sonnet-4-20250514`.
    pub model: String,

    /// Maximum tokens the oracle may generate for a solicitor letter.
    /// Default: 1000.
    ///
    /// The reply is a four-field JSON object; 1000 tokens leaves generous
    /// headroom for long addresses without letting a confused model ramble.
    pub letter_max_tokens: u32,

    /// Maximum tokens the oracle may generate for an audiogram. Default: 500.
    ///
    /// A single date field needs far less than the letter budget.
    pub audiogram_max_tokens: u32,

    /// Client-side timeout on each oracle call, in seconds. Default: 60.
    ///
    /// Without it an unresponsive oracle stalls the HTTP request
    /// indefinitely; 60 s covers large PDF uploads on slow links.
    pub api_timeout_secs: u64,

    /// Oracle API base URL. Default: `https://api.anthropic.com`.
    ///
    /// Override to route through a proxy or a local stub.
    pub base_url: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            letter_max_tokens: 1000,
            audiogram_max_tokens: 500,
            api_timeout_secs: 60,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn letter_max_tokens(mut self, n: u32) -> Self {
        self.config.letter_max_tokens = n;
        self
    }

    pub fn audiogram_max_tokens(mut self, n: u32) -> Self {
        self.config.audiogram_max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(ExtractError::InvalidConfig("Model must not be empty".into()));
        }
        if c.letter_max_tokens == 0 || c.audiogram_max_tokens == 0 {
            return Err(ExtractError::InvalidConfig(
                "Token budgets must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(ExtractError::InvalidConfig(format!(
                "Base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}
