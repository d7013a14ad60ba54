//! Retry policy with exponential backoff for transient AnkiConnect failures.
//!
//! Only [`Error::is_transient`](crate::Error::is_transient) failures (connection and timeout) are retried.
//! API errors are returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::Result;

/// Default number of retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry.
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Default upper bound for a single backoff delay.
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Retry configuration for AnkiConnect calls.
///
/// The delay before retry `n` (0-based) is `initial_backoff * 2^n`, capped at
/// `max_backoff`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ankiconnect::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(1));
/// assert_eq!(policy.max_attempts(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy.
    ///
    /// `max_backoff` is raised to `initial_backoff` if it is smaller.
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay to wait before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Sum of every backoff delay the policy can incur.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries).map(|retry| self.backoff(retry)).sum()
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out.
    pub async fn execute<F, Fut, T>(&self, action: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(action, attempts = retry + 1, "AnkiConnect call recovered");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && retry < self.max_retries => {
                    let delay = self.backoff(retry);
                    warn!(
                        action,
                        attempt = retry + 1,
                        error = %err,
                        ?delay,
                        "Transient AnkiConnect failure, retrying"
                    );
                    sleep(delay).await;
                    retry += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(action, attempts = retry + 1, error = %err, "AnkiConnect call gave up");
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            DEFAULT_INITIAL_BACKOFF,
            DEFAULT_MAX_BACKOFF,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(4))
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(500));

        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(500));
        assert_eq!(policy.backoff(30), Duration::from_millis(500));
    }

    #[test]
    fn default_policy_is_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.total_backoff(), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn recovers_after_one_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = fast_policy(2)
            .execute("version", || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(Error::Connection("refused".into()))
                    } else {
                        Ok(6)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(6));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn api_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<()> = fast_policy(2)
            .execute("createDeck", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::Api("deck name is invalid".into()))
                }
            })
            .await;

        assert_eq!(result, Err(Error::Api("deck name is invalid".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<()> = fast_policy(2)
            .execute("deckNames", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::Timeout(Duration::from_millis(5)))
                }
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
