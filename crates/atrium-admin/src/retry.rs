//! Bounded-attempt retry with exponential backoff for transient failures.
//!
//! Only errors where [`AdminError::is_retryable`] returns `true` are
//! retried; everything else propagates on first occurrence. Backoff grows
//! exponentially (`initial * multiplier^attempt`), is capped, and carries
//! optional 0-50% jitter to avoid thundering-herd effects across console
//! replicas.
//!
//! The executor observes a [`CancellationToken`] both before issuing an
//! attempt and while an attempt or a backoff sleep is in flight; on
//! cancellation it returns [`AdminError::Cancelled`] immediately rather
//! than a stale operation error.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{AdminError, Result};

/// Configuration for retry behavior on transient transport failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, including the first (minimum 1)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the second attempt, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Upper bound for any single backoff, in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Exponential growth factor between attempts
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Add 0-50% random jitter to each backoff
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    /// Create a configuration that never retries
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the total attempt count
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the initial backoff
    #[must_use]
    pub fn with_initial_backoff_ms(mut self, ms: u64) -> Self {
        self.initial_backoff_ms = ms;
        self
    }

    /// Set the backoff cap
    #[must_use]
    pub fn with_max_backoff_ms(mut self, ms: u64) -> Self {
        self.max_backoff_ms = ms;
        self
    }

    /// Set the exponential growth factor
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Enable or disable jitter
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Backoff to sleep after the given zero-based attempt:
    /// `min(initial * multiplier^attempt, max)` plus optional jitter.
    fn backoff_for(&self, attempt: u32) -> Duration {
        let base = (self.initial_backoff_ms as f64) * self.multiplier.powi(attempt as i32);
        let capped = Duration::from_millis(base as u64).min(Duration::from_millis(self.max_backoff_ms));

        if self.jitter {
            let jitter_range = capped.as_millis() as u64 / 2;
            if jitter_range > 0 {
                let jitter = rand::thread_rng().gen_range(0..=jitter_range);
                return capped + Duration::from_millis(jitter);
            }
        }
        capped
    }

    /// Execute `operation` with bounded retries on transient failure.
    ///
    /// Returns the first success, the first terminal error, or
    /// [`AdminError::RetriesExhausted`] wrapping the last transient error
    /// once all attempts are spent. Cancellation aborts the in-flight
    /// attempt or backoff sleep and returns [`AdminError::Cancelled`]; no
    /// further attempt is issued.
    pub async fn run<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error: Option<AdminError> = None;

        for attempt in 0..attempts {
            if cancel.is_cancelled() {
                return Err(AdminError::Cancelled);
            }

            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(AdminError::Cancelled),
                outcome = operation() => outcome,
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() => {
                    if attempt + 1 < attempts {
                        let delay = self.backoff_for(attempt);
                        tracing::debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "transient error, retrying after backoff"
                        );
                        tokio::select! {
                            () = cancel.cancelled() => return Err(AdminError::Cancelled),
                            () = tokio::time::sleep(delay) => {}
                        }
                    }
                    last_error = Some(err);
                }
                Err(err) => {
                    tracing::debug!(
                        operation = operation_name,
                        error = %err,
                        "terminal error, not retrying"
                    );
                    return Err(err);
                }
            }
        }

        match last_error {
            Some(source) => Err(AdminError::RetriesExhausted {
                attempts,
                source: Box::new(source),
            }),
            None => Err(AdminError::transport(
                "retry loop completed without result or error",
            )),
        }
    }

    /// Like [`run`](Self::run) but also bounds the total wall-clock time of
    /// all attempts and backoff sleeps. An elapsed deadline behaves as
    /// cancellation.
    pub async fn run_with_deadline<F, Fut, T>(
        &self,
        deadline: Duration,
        cancel: &CancellationToken,
        operation_name: &str,
        operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(deadline, self.run(cancel, operation_name, operation)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(AdminError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    use super::*;

    fn fast_config() -> RetryConfig {
        RetryConfig::default()
            .with_max_attempts(3)
            .with_initial_backoff_ms(1)
            .with_max_backoff_ms(10)
            .with_jitter(false)
    }

    #[test]
    fn test_backoff_exponential_curve() {
        let config = RetryConfig::default()
            .with_initial_backoff_ms(100)
            .with_multiplier(2.0)
            .with_max_backoff_ms(10_000)
            .with_jitter(false);

        assert_eq!(config.backoff_for(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for(2), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let config = RetryConfig::default()
            .with_initial_backoff_ms(1_000)
            .with_max_backoff_ms(5_000)
            .with_jitter(false);

        // Attempt 5 would be 32s uncapped.
        assert_eq!(config.backoff_for(5), Duration::from_millis(5_000));
    }

    #[test]
    fn test_backoff_jitter_band() {
        let config = RetryConfig::default()
            .with_initial_backoff_ms(100)
            .with_max_backoff_ms(10_000)
            .with_jitter(true);

        for _ in 0..50 {
            let d = config.backoff_for(1);
            assert!(d >= Duration::from_millis(200));
            assert!(d <= Duration::from_millis(300)); // 200 + up to 50%
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result = fast_config()
            .run(&cancel, "test_op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, AdminError>(42) }
            })
            .await;

        assert_eq!(result.ok(), Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result = fast_config()
            .run(&cancel, "test_op", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(AdminError::transport("connection refused"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.ok(), Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_rejection_not_retried() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32> = fast_config()
            .run(&cancel, "test_op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(AdminError::Rejection {
                        status: 404,
                        body: "no such bucket".into(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(AdminError::Rejection { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_counts_attempts() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32> = fast_config()
            .run(&cancel, "test_op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AdminError::transport("connection refused")) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(AdminError::RetriesExhausted { attempts: 3, source }) => {
                assert!(source.is_retryable());
            }
            other => panic!("expected RetriesExhausted, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhaustion_delays_follow_curve() {
        // 10ms then 20ms of backoff between three failing attempts.
        let config = RetryConfig::default()
            .with_max_attempts(3)
            .with_initial_backoff_ms(10)
            .with_max_backoff_ms(1_000)
            .with_jitter(false);
        let cancel = CancellationToken::new();

        let start = Instant::now();
        let result: Result<i32> = config
            .run(&cancel, "test_op", || async {
                Err(AdminError::transport("connection refused"))
            })
            .await;
        let elapsed = start.elapsed();

        assert!(matches!(result, Err(AdminError::RetriesExhausted { .. })));
        assert!(elapsed >= Duration::from_millis(30), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(300), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<i32> = fast_config()
            .run(&cancel, "test_op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert!(matches!(result, Err(AdminError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_backoff_returns_promptly() {
        // Backoff far longer than the test; cancellation must cut it short
        // without a second attempt.
        let config = RetryConfig::default()
            .with_max_attempts(3)
            .with_initial_backoff_ms(60_000)
            .with_jitter(false);
        let calls = std::sync::Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let counter = calls.clone();
        let result: Result<i32> = config
            .run(&cancel, "test_op", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(AdminError::transport("connection refused")) }
            })
            .await;
        let elapsed = start.elapsed();

        assert!(matches!(result, Err(AdminError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(elapsed < Duration::from_millis(500), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_deadline_bounds_retries() {
        let config = RetryConfig::default()
            .with_max_attempts(100)
            .with_initial_backoff_ms(1_000)
            .with_jitter(false);
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32> = config
            .run_with_deadline(Duration::from_millis(50), &cancel, "test_op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AdminError::transport("connection refused")) }
            })
            .await;

        assert!(matches!(result, Err(AdminError::Cancelled)));
        assert!(calls.load(Ordering::SeqCst) < 100);
    }
}
