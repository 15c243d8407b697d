//! Exponential backoff for rate-limited provider calls, bounded by a deadline.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::AiError;

/// Retries after the first attempt; four attempts in total.
pub const MAX_RETRIES: u32 = 3;
const INITIAL_INTERVAL: Duration = Duration::from_secs(1);
const BACKOFF_MULTIPLIER: f64 = 2.0;

fn schedule() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: INITIAL_INTERVAL,
        initial_interval: INITIAL_INTERVAL,
        randomization_factor: 0.0,
        multiplier: BACKOFF_MULTIPLIER,
        max_interval: Duration::from_secs(30),
        max_elapsed_time: None,
        ..Default::default()
    }
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or the
/// retries run out.
///
/// Only [`AiError::RateLimited`] is retried, after waits of 1s, 2s and 4s.
/// Exhaustion yields [`AiError::RateLimitExceeded`] carrying `hint`. Each
/// attempt and each wait is cut short by `deadline`, which yields
/// [`AiError::DeadlineExceeded`].
pub async fn retry_rate_limited<T, F, Fut>(
    deadline: Instant,
    hint: &str,
    mut attempt: F,
) -> Result<T, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut backoff = schedule();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let outcome = tokio::time::timeout_at(deadline, attempt())
            .await
            .map_err(|_| AiError::DeadlineExceeded)?;

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => err,
            Err(err) => return Err(err),
        };

        if attempts > MAX_RETRIES {
            warn!(attempts, "Rate limit retries exhausted");
            return Err(AiError::RateLimitExceeded {
                attempts,
                hint: hint.to_string(),
            });
        }

        let wait = backoff.next_backoff().unwrap_or(INITIAL_INTERVAL);
        debug!(attempt = attempts, wait_secs = wait.as_secs_f64(), error = %err, "Rate limited, backing off");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::time::sleep_until(deadline) => return Err(AiError::DeadlineExceeded),
        }
    }
}
