//! Bounded fixed-delay retry.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Poll attempts before giving up on a query (~10 minutes at the default delay).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 200;

/// Fixed delay between poll attempts, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 3000;

/// Outcome of a single attempt: done, or try again later.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T, P> {
    /// The operation finished with a value.
    Ready(T),
    /// Not done yet; carries the state observed on this attempt.
    Pending(P),
}

/// Result of driving a [`RetryPolicy`] to its end.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T, P> {
    /// The operation completed within the attempt budget.
    Completed(T),
    /// The budget ran out; carries the attempt count and the last
    /// observed pending state.
    Exhausted { attempts: u32, last: P },
}

/// Fixed-delay, bounded-attempt retry policy.
///
/// Runs an operation up to `max_attempts` times with `delay` between
/// attempts. Errors from the operation abort immediately; only
/// [`Attempt::Pending`] outcomes are retried. At least one attempt is
/// always made, and no delay is inserted before the first attempt or
/// after the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Drive `op` until it returns [`Attempt::Ready`], it errors, or the
    /// attempt budget is exhausted. `op` receives the 1-based attempt
    /// number.
    pub async fn run<T, P, E, F, Fut>(&self, mut op: F) -> Result<RetryOutcome<T, P>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Attempt<T, P>, E>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op(attempt).await? {
                Attempt::Ready(value) => return Ok(RetryOutcome::Completed(value)),
                Attempt::Pending(state) => {
                    if attempt >= self.max_attempts {
                        return Ok(RetryOutcome::Exhausted {
                            attempts: attempt,
                            last: state,
                        });
                    }
                    debug!(attempt, max_attempts = self.max_attempts, "attempt pending, retrying");
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct TestErr(&'static str);

    #[tokio::test(start_paused = true)]
    async fn ready_on_first_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3));
        let outcome: Result<_, TestErr> = policy
            .run(|attempt| async move { Ok(Attempt::<u32, &str>::Ready(attempt)) })
            .await;
        assert_eq!(outcome.unwrap(), RetryOutcome::Completed(1));
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_some_pending_attempts() {
        let policy = RetryPolicy::new(10, Duration::from_secs(3));
        let outcome: Result<_, TestErr> = policy
            .run(|attempt| async move {
                if attempt < 4 {
                    Ok(Attempt::Pending("running"))
                } else {
                    Ok(Attempt::Ready(attempt))
                }
            })
            .await;
        assert_eq!(outcome.unwrap(), RetryOutcome::Completed(4));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_attempts() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3));
        let outcome: Result<RetryOutcome<u32, _>, TestErr> = policy
            .run(|_| async move { Ok(Attempt::Pending("still running")) })
            .await;
        assert_eq!(
            outcome.unwrap(),
            RetryOutcome::Exhausted {
                attempts: 5,
                last: "still running",
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn error_aborts_immediately() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3));
        let outcome: Result<RetryOutcome<u32, &str>, TestErr> = policy
            .run(|attempt| async move {
                if attempt == 2 {
                    Err(TestErr("boom"))
                } else {
                    Ok(Attempt::Pending("running"))
                }
            })
            .await;
        assert_eq!(outcome.unwrap_err(), TestErr("boom"));
    }

    #[test]
    fn default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 200);
        assert_eq!(policy.delay, Duration::from_millis(3000));
    }
}
