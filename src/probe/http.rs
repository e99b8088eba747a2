//! HTTP connection probe.

use std::time::Duration;

use crate::config::Config;
use crate::probe::{detect_connection_quality, ConnectionStatus, NetworkHints};

/// Probes connectivity with a `HEAD` request.
///
/// Any response counts as reachable, whatever its status code. Transport
/// errors and the client timeout make the probe report `Unknown`.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
    hints: NetworkHints,
}

impl HttpProbe {
    /// Creates a probe for `url` whose request gives up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            hints: NetworkHints::default(),
        })
    }

    /// Creates a probe for `config.probe_url` bounded by the prefetch timeout.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.probe_url.clone(), config.prefetch_timeout)
    }

    pub fn with_hints(mut self, hints: NetworkHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues one request and classifies its latency.
    pub async fn check(&self) -> ConnectionStatus {
        let request = self.client.head(self.url.as_str());
        detect_connection_quality(|| request.send(), &self.hints).await
    }
}
