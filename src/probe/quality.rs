//! Connection quality classification.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::exec::guarded;

/// Latency below this is `Fast`
pub const FAST_LATENCY_THRESHOLD: Duration = Duration::from_millis(100);
/// Latency below this (and not fast) is `Normal`; anything else is `Slow`
pub const NORMAL_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

// == Connection Quality ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    Fast,
    Normal,
    Slow,
    /// The probe itself failed
    Unknown,
}

impl ConnectionQuality {
    pub fn from_latency(latency: Duration) -> Self {
        if latency < FAST_LATENCY_THRESHOLD {
            ConnectionQuality::Fast
        } else if latency < NORMAL_LATENCY_THRESHOLD {
            ConnectionQuality::Normal
        } else {
            ConnectionQuality::Slow
        }
    }
}

// == Network Hints ==
/// Platform signals the probe reports as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHints {
    /// Whether the platform believes it is online
    pub online: bool,
    /// Network type hint such as "4g" or "wifi"
    pub effective_type: Option<String>,
}

impl Default for NetworkHints {
    fn default() -> Self {
        Self {
            online: true,
            effective_type: None,
        }
    }
}

// == Connection Status ==
/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub online: bool,
    /// `None` when the probe failed, i.e. unbounded latency
    #[serde(serialize_with = "serialize_latency")]
    pub latency: Option<Duration>,
    pub quality: ConnectionQuality,
    pub effective_type: String,
    pub checked_at: DateTime<Utc>,
}

impl ConnectionStatus {
    /// Latency in milliseconds, `f64::INFINITY` when the probe failed.
    pub fn latency_ms(&self) -> f64 {
        self.latency
            .map(|l| l.as_secs_f64() * 1000.0)
            .unwrap_or(f64::INFINITY)
    }

    /// True when calling code should switch to its slow-network behavior.
    pub fn is_degraded(&self) -> bool {
        !self.online || matches!(self.quality, ConnectionQuality::Slow | ConnectionQuality::Unknown)
    }
}

fn serialize_latency<S>(latency: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match latency {
        Some(l) => serializer.serialize_some(&(l.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}

// == Detect Connection Quality ==
/// Times one `probe` call and classifies the latency.
///
/// Never fails: if the probe errors or panics, the status reports no latency
/// and `Unknown` quality, with the hints still passed through.
pub async fn detect_connection_quality<T, E, F, Fut>(
    probe: F,
    hints: &NetworkHints,
) -> ConnectionStatus
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let outcome = guarded(probe()).await;
    let elapsed = started.elapsed();

    let (latency, quality) = match outcome {
        Ok(_) => (Some(elapsed), ConnectionQuality::from_latency(elapsed)),
        Err(err) => {
            debug!(error = %err, "Connection probe failed");
            (None, ConnectionQuality::Unknown)
        }
    };

    ConnectionStatus {
        online: hints.online,
        latency,
        quality,
        effective_type: hints
            .effective_type
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        checked_at: Utc::now(),
    }
}
