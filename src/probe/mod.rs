//! Connection Probe Module
//!
//! Best-effort, one-shot latency sample telling calling code whether the
//! network looks fast, normal or slow.
//!
//! # Components
//! - `detect_connection_quality`: times any probe operation
//! - `HttpProbe`: a `HEAD` request against a configured URL

mod http;
mod quality;

pub use http::HttpProbe;
pub use quality::{
    detect_connection_quality, ConnectionQuality, ConnectionStatus, NetworkHints,
    FAST_LATENCY_THRESHOLD, NORMAL_LATENCY_THRESHOLD,
};
