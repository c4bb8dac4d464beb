//! HTTP server binary for mnihl-extract.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to an `ExtractionConfig`, builds the oracle client, and serves.

use anyhow::{Context, Result};
use clap::Parser;
use mnihl_extract::{
    router, AnthropicOracle, AppState, DocumentExtractor, ExtractionConfig, Oracle,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"ENDPOINTS:
  GET  /                       Health/readiness (reports oracle configuration)
  POST /api/extract            Combined extraction: multipart fields
                               'solicitor_letter' and 'audiogram', both required
  POST /api/extract/solicitor  Letter only (debugging)
  POST /api/extract/audiogram  Audiogram only (debugging)

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY   Oracle credential. When unset the service starts in
                      degraded mode: GET / reports api_key_configured=false,
                      POST /api/extract returns 500, and the per-document
                      endpoints return empty records.
  MNIHL_HOST          Bind address (default 0.0.0.0)
  MNIHL_PORT          Listen port (default 8000)
  MNIHL_MODEL         Oracle model override
  RUST_LOG            Tracing filter (overrides -v)

SETUP:
  1. Set API key:  export ANTHROPIC_API_KEY=sk-ant-...
  2. Serve:        mnihl-api --port 8000
  3. Extract:      curl -F solicitor_letter=@letter.pdf -F audiogram=@chart.png \
                        http://localhost:8000/api/extract
"#;

/// Extract MNIHL report fields from solicitor letters and audiograms.
#[derive(Parser, Debug)]
#[command(
    name = "mnihl-api",
    version,
    about = "HTTP service extracting MNIHL report fields from solicitor letters and audiograms",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind address.
    #[arg(long, env = "MNIHL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port.
    #[arg(short, long, env = "MNIHL_PORT", default_value_t = 8000)]
    port: u16,

    /// Oracle model identifier.
    #[arg(long, env = "MNIHL_MODEL")]
    model: Option<String>,

    /// Per-call oracle timeout in seconds.
    #[arg(long, env = "MNIHL_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MNIHL_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ExtractionConfig::builder().api_timeout_secs(cli.api_timeout);
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Build oracle client (degraded mode when no key) ──────────────────
    let oracle: Option<Arc<dyn Oracle>> = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let client =
                AnthropicOracle::new(key, &config).context("Failed to build oracle client")?;
            tracing::info!(model = client.model(), "oracle client initialised");
            Some(Arc::new(client))
        }
        _ => {
            tracing::warn!(
                "ANTHROPIC_API_KEY is not set; /api/extract will return 500 and the \
                 per-document endpoints will return empty records"
            );
            None
        }
    };

    let state = Arc::new(AppState {
        extractor: DocumentExtractor::new(oracle, config),
    });

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "mnihl-api listening");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
