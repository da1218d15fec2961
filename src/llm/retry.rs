//! Retry policy for transient transport failures.
//!
//! The policy is explicit and owned by the client that uses it: bounded
//! attempts, exponential backoff between a base and a cap, and retries only
//! for errors classified transient by [`LLMError::is_transient`]. API errors
//! propagate immediately.

use crate::llm::types::LLMError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and default delays
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Backoff delay after the given 1-based failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let raw_ms = self.base_delay.as_millis().saturating_mul(1u128 << exponent);
        let capped_ms = raw_ms.min(self.max_delay.as_millis()) as u64;

        // Add jitter (±10%)
        let jitter = (rand::random::<f64>() - 0.5) * 0.2;
        let jittered = Duration::from_millis(((capped_ms as f64) * (1.0 + jitter)) as u64);

        jittered.min(self.max_delay)
    }

    /// Run an operation, retrying transient failures up to the attempt budget
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, LLMError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LLMError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "transient LLM error on attempt {}/{}: {} (retrying in {:?})",
                        attempt, self.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_delay_grows_exponentially_within_bounds() {
        let policy = RetryPolicy::default();

        let first = policy.delay_for(1);
        assert!(first >= Duration::from_millis(1800) && first <= Duration::from_millis(2200));

        let second = policy.delay_for(2);
        assert!(second >= Duration::from_millis(3600) && second <= Duration::from_millis(4400));

        // Uncapped this would be 32s; the cap (and jitter re-cap) holds it at 10s.
        let fifth = policy.delay_for(5);
        assert!(fifth <= Duration::from_secs(10));
        assert!(fifth >= Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = fast_policy()
            .run(|_attempt| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(LLMError::Connect("refused".into()))
                    } else {
                        Ok("done".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_api_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<String, LLMError> = fast_policy()
            .run(|_attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(LLMError::Api {
                        status: 500,
                        message: "server error".into(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "API errors must fail fast");
    }

    #[tokio::test]
    async fn test_attempt_budget_is_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<String, LLMError> = fast_policy()
            .run(|_attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(LLMError::Timeout(60))
                }
            })
            .await;

        assert!(matches!(result, Err(LLMError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
