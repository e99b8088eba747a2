//! Fast Cache - connection probe diagnostic
//!
//! Runs one connection quality probe against the configured URL and prints
//! the result as JSON.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fast_cache::{Config, HttpProbe};

/// Entry point for the probe diagnostic.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Probe the configured URL once
/// 4. Print the connection status to stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fast_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: probe_url={}, timeout={}ms",
        config.probe_url,
        config.prefetch_timeout.as_millis()
    );

    let probe = HttpProbe::from_config(&config).context("Failed to build HTTP client")?;
    let status = probe.check().await;
    info!(
        quality = ?status.quality,
        latency_ms = status.latency_ms(),
        "Probe complete"
    );

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
