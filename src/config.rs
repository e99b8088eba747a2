//! Configuration Module
//!
//! Handles loading orchestration defaults from environment variables and
//! the per-call option structs derived from them.

use std::env;
use std::time::Duration;

/// Default freshness window for cached results
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Default per-call deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default deadline used when warming the cache
pub const DEFAULT_PREFETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(5000);
/// Upper bound (exclusive) of the additive jitter
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(1000);
/// Default batch group size
pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_PROBE_URL: &str = "https://www.gstatic.com/generate_204";

/// Library configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Freshness window for `get_or_execute`
    pub default_ttl: Duration,
    /// Deadline for `get_or_execute` and each retry attempt
    pub default_timeout: Duration,
    /// Deadline for `prefetch`
    pub prefetch_timeout: Duration,
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
    /// Batch group size
    pub chunk_size: usize,
    /// Interval of the background entry sweep
    pub sweep_interval: Duration,
    /// Target of the connection probe
    pub probe_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FAST_CACHE_TTL_MS` - Cache freshness window (default: 300000)
    /// - `FAST_CACHE_TIMEOUT_MS` - Per-call deadline (default: 30000)
    /// - `FAST_CACHE_PREFETCH_TIMEOUT_MS` - Prefetch deadline (default: 10000)
    /// - `FAST_CACHE_MAX_RETRIES` - Retries after the first attempt (default: 3)
    /// - `FAST_CACHE_INITIAL_DELAY_MS` - First backoff delay (default: 500)
    /// - `FAST_CACHE_MAX_DELAY_MS` - Backoff cap (default: 5000)
    /// - `FAST_CACHE_MAX_JITTER_MS` - Jitter upper bound (default: 1000)
    /// - `FAST_CACHE_CHUNK_SIZE` - Batch group size (default: 5)
    /// - `FAST_CACHE_SWEEP_INTERVAL_MS` - Entry sweep interval (default: 60000)
    /// - `FAST_CACHE_PROBE_URL` - Connection probe target
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_millis("FAST_CACHE_TTL_MS").unwrap_or(defaults.default_ttl),
            default_timeout: env_millis("FAST_CACHE_TIMEOUT_MS")
                .unwrap_or(defaults.default_timeout),
            prefetch_timeout: env_millis("FAST_CACHE_PREFETCH_TIMEOUT_MS")
                .unwrap_or(defaults.prefetch_timeout),
            max_retries: env_parse("FAST_CACHE_MAX_RETRIES").unwrap_or(defaults.max_retries),
            initial_delay: env_millis("FAST_CACHE_INITIAL_DELAY_MS")
                .unwrap_or(defaults.initial_delay),
            max_delay: env_millis("FAST_CACHE_MAX_DELAY_MS").unwrap_or(defaults.max_delay),
            max_jitter: env_millis("FAST_CACHE_MAX_JITTER_MS").unwrap_or(defaults.max_jitter),
            chunk_size: env_parse("FAST_CACHE_CHUNK_SIZE").unwrap_or(defaults.chunk_size),
            sweep_interval: env_millis("FAST_CACHE_SWEEP_INTERVAL_MS")
                .unwrap_or(defaults.sweep_interval),
            probe_url: env::var("FAST_CACHE_PROBE_URL").unwrap_or(defaults.probe_url),
        }
    }

    /// Options for `get_or_execute` built from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            ttl: self.default_ttl,
            timeout: self.default_timeout,
        }
    }

    /// Options for `prefetch`: same TTL, shorter deadline.
    pub fn prefetch_options(&self) -> CacheOptions {
        CacheOptions {
            ttl: self.default_ttl,
            timeout: self.prefetch_timeout,
        }
    }

    /// Options for `optimized_api_call` built from this configuration.
    pub fn retry_options(&self) -> RetryOptions {
        RetryOptions {
            max_retries: self.max_retries,
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            timeout: self.default_timeout,
            max_jitter: self.max_jitter,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            default_timeout: DEFAULT_TIMEOUT,
            prefetch_timeout: DEFAULT_PREFETCH_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            probe_url: DEFAULT_PROBE_URL.to_string(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}

// == Cache Options ==
/// Per-call options for `get_or_execute` and `prefetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// A cached value younger than this is returned without executing
    pub ttl: Duration,
    /// Deadline for the operation when it does execute
    pub timeout: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CacheOptions {
    /// Defaults used when warming the cache: default TTL, 10 s deadline.
    pub fn prefetch() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_PREFETCH_TIMEOUT,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// == Retry Options ==
/// Per-call options for `optimized_api_call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    /// Retries after the first attempt; total attempts = `max_retries + 1`
    pub max_retries: u32,
    /// Pre-jitter delay before the first retry, doubled after every attempt
    pub initial_delay: Duration,
    /// Cap applied to `delay + jitter`
    pub max_delay: Duration,
    /// Deadline for each individual attempt
    pub timeout: Duration,
    /// Jitter is sampled uniformly from `[0, max_jitter)`
    pub max_jitter: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            timeout: DEFAULT_TIMEOUT,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }
}
