//! Retrying Caller
//!
//! Wraps one operation with a per-attempt timeout and exponential backoff
//! with additive jitter.
//!
//! # Example
//!
//! ```no_run
//! use fast_cache::{optimized_api_call, RetryOptions};
//!
//! # async fn example() -> Result<(), fast_cache::RequestError<String>> {
//! let profile = optimized_api_call(
//!     || async { Ok::<_, String>("admin profile".to_string()) },
//!     &RetryOptions::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{error, info, warn};

use crate::config::RetryOptions;
use crate::error::Result;
use crate::exec::timeout::execute_with_timeout;

// == Backoff ==
/// Delay schedule between attempts.
///
/// The pre-jitter base starts at the initial delay and doubles after every
/// wait, independent of how long attempts take. Each wait is
/// `min(base + jitter, max_delay)` with jitter re-sampled from
/// `[0, max_jitter)`.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max_delay: Duration,
    max_jitter: Duration,
}

impl Backoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            current: initial_delay,
            max_delay,
            max_jitter,
        }
    }

    pub fn from_options(options: &RetryOptions) -> Self {
        Self::new(options.initial_delay, options.max_delay, options.max_jitter)
    }

    /// Pre-jitter delay the next wait is based on.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Samples jitter and returns the next wait.
    pub fn next_wait(&mut self) -> Duration {
        let jitter = sample_jitter(self.max_jitter);
        self.wait_with_jitter(jitter)
    }

    /// Returns the next wait for a given jitter and doubles the base.
    pub fn wait_with_jitter(&mut self, jitter: Duration) -> Duration {
        let wait = self.current.saturating_add(jitter).min(self.max_delay);
        self.current = self.current.saturating_mul(2);
        wait
    }
}

/// Uniform sample from `[0, max)`; zero when `max` is zero.
pub fn sample_jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let upper = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(rand::thread_rng().gen_range(0..upper))
}

// == Optimized API Call ==
/// Calls `operation` until it succeeds or `max_retries + 1` attempts have failed.
///
/// Every attempt is raced against `options.timeout`; losing the race counts
/// as a failure and the timed-out attempt keeps running detached. On
/// exhaustion the last error is returned.
pub async fn optimized_api_call<T, E, F, Fut>(
    mut operation: F,
    options: &RetryOptions,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Debug + Send + 'static,
{
    let mut backoff = Backoff::from_options(options);
    let mut attempt: u32 = 0;

    loop {
        match execute_with_timeout(|| operation(), options.timeout).await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if attempt < options.max_retries => {
                let wait = backoff.next_wait();
                attempt += 1;

                warn!(
                    error = ?err,
                    attempt,
                    max_retries = options.max_retries,
                    delay_ms = wait.as_millis() as u64,
                    "Operation failed, retrying"
                );

                tokio::time::sleep(wait).await;
            }
            Err(err) => {
                error!(
                    error = ?err,
                    attempts = attempt + 1,
                    "Operation failed after all retry attempts exhausted"
                );
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn no_jitter() -> RetryOptions {
        RetryOptions::default().with_max_jitter(Duration::ZERO)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_no_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let result = optimized_api_call(
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                }
            },
            &RetryOptions::default(),
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(counter.load(Ordering::SeqCst), 1, "should only call once");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_then_succeed() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let result = optimized_api_call(
            move || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(format!("attempt {n} refused"))
                    } else {
                        Ok("session")
                    }
                }
            },
            &no_jitter(),
        )
        .await;

        assert_eq!(result, Ok("session"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let result = optimized_api_call(
            move || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err::<(), _>(format!("failure #{n}"))
                }
            },
            &no_jitter().with_max_retries(3),
        )
        .await;

        assert_eq!(counter.load(Ordering::SeqCst), 4, "max_retries + 1 attempts");
        assert_eq!(result, Err(RequestError::Operation("failure #4".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_type_without_display() {
        #[derive(Debug, Clone, PartialEq)]
        enum Status {
            Unavailable,
        }

        let result = optimized_api_call(
            || async { Err::<(), _>(Status::Unavailable) },
            &no_jitter().with_max_retries(1),
        )
        .await;

        assert_eq!(result, Err(RequestError::Operation(Status::Unavailable)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_single_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let result = optimized_api_call(
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("down")
                }
            },
            &no_jitter().with_max_retries(0),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_double_and_cap() {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorder = starts.clone();
        let options = no_jitter()
            .with_max_retries(4)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_millis(3000));

        let result = optimized_api_call(
            move || {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(Instant::now());
                    Err::<(), _>("unavailable")
                }
            },
            &options,
        )
        .await;
        assert!(result.is_err());

        let starts = starts.lock().unwrap();
        let gaps: Vec<u128> = starts
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis())
            .collect();
        assert_eq!(gaps, vec![500, 1000, 2000, 3000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();
        let options = no_jitter()
            .with_timeout(Duration::from_millis(100))
            .with_initial_delay(Duration::from_millis(10));

        let result = optimized_api_call(
            move || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                    }
                    Ok::<_, String>(n)
                }
            },
            &options,
        )
        .await;

        assert_eq!(result, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_last_error() {
        let options = no_jitter()
            .with_max_retries(1)
            .with_timeout(Duration::from_millis(50))
            .with_initial_delay(Duration::from_millis(10));

        let result = optimized_api_call(
            || async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, String>(())
            },
            &options,
        )
        .await;

        assert_eq!(result, Err(RequestError::Timeout(Duration::from_millis(50))));
    }

    #[test]
    fn test_backoff_schedule_without_jitter() {
        let mut backoff = Backoff::new(
            Duration::from_millis(500),
            Duration::from_millis(5000),
            Duration::ZERO,
        );

        let waits: Vec<u128> = (0..5).map(|_| backoff.next_wait().as_millis()).collect();
        assert_eq!(waits, vec![500, 1000, 2000, 4000, 5000]);
        assert_eq!(backoff.current(), Duration::from_millis(16000));
    }

    #[test]
    fn test_jitter_is_additive_and_capped() {
        let mut backoff = Backoff::new(
            Duration::from_millis(500),
            Duration::from_millis(5000),
            Duration::from_millis(1000),
        );

        assert_eq!(
            backoff.wait_with_jitter(Duration::from_millis(300)),
            Duration::from_millis(800)
        );
        assert_eq!(
            backoff.wait_with_jitter(Duration::from_millis(999)),
            Duration::from_millis(1999)
        );
        backoff.wait_with_jitter(Duration::ZERO);
        assert_eq!(
            backoff.wait_with_jitter(Duration::from_millis(999)),
            Duration::from_millis(4999)
        );
        assert_eq!(
            backoff.wait_with_jitter(Duration::from_millis(1)),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_sample_jitter_bounds() {
        assert_eq!(sample_jitter(Duration::ZERO), Duration::ZERO);
        for _ in 0..1000 {
            assert!(sample_jitter(Duration::from_millis(1000)) < Duration::from_millis(1000));
        }
    }
}
