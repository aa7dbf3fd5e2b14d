// src/core/retry.rs
// Bounded retry with exponential backoff around one network-bound operation.
// Exhaustion hands the last error back; the caller decides what that means for the run.

use std::{thread, time::Duration};

use tracing::debug;

use crate::config::consts::{BACKOFF_FACTOR, INITIAL_DELAY_MS, MAX_DELAY_MS, RETRIES};

/// Whether another attempt may succeed where this one failed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub factor: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRIES,
            initial_delay: Duration::from_millis(INITIAL_DELAY_MS),
            factor: BACKOFF_FACTOR,
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            factor: 1,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after the `failed`-th attempt (1-based): initial * factor^(failed-1), capped.
    pub fn delay_after(&self, failed: u32) -> Duration {
        let exp = failed.saturating_sub(1);
        let mult = self.factor.checked_pow(exp).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(mult)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// One failed attempt, handed to the `on_retry` observer before sleeping.
pub struct Attempt<'e, E> {
    pub number: u32,
    pub max: u32,
    pub delay: Duration,
    pub error: &'e E,
}

/// Run `op` until it succeeds, fails with a non-transient error, or the attempts run out.
/// `op` receives the 1-based attempt number.
pub fn with_retry<T, E, Op, OnRetry>(
    policy: &RetryPolicy,
    mut op: Op,
    mut on_retry: OnRetry,
) -> Result<T, E>
where
    E: Transient,
    Op: FnMut(u32) -> Result<T, E>,
    OnRetry: FnMut(Attempt<'_, E>),
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max && e.is_transient() => {
                let delay = policy.delay_after(attempt);
                on_retry(Attempt { number: attempt, max, delay, error: &e });
                debug!(attempt, max, ?delay, "retrying after transient failure");
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
