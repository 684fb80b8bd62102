//! Self-imposed rate limiting between requests.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::models::RatePolicy;

/// How the request before the pause went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Failure,
}

#[derive(Debug)]
struct State {
    consecutive_failures: u32,
    tokens: f64,
    last_refill: Instant,
}

/// A rate policy plus the bookkeeping it needs.
///
/// Shared by all requests of one kind, so concurrent fetches draw from the
/// same budget.
#[derive(Debug)]
pub struct Throttle {
    policy: RatePolicy,
    state: Mutex<State>,
}

impl Throttle {
    pub fn new(policy: RatePolicy) -> Self {
        let tokens = match policy {
            RatePolicy::TokenBucket { capacity, .. } => f64::from(capacity),
            _ => 0.0,
        };
        Self {
            policy,
            state: Mutex::new(State {
                consecutive_failures: 0,
                tokens,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Pause owed after a request with the given outcome.
    pub fn next_delay(&self, outcome: FetchOutcome) -> Duration {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match self.policy {
            RatePolicy::Disabled => Duration::ZERO,
            RatePolicy::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            RatePolicy::Backoff { base_ms, max_ms } => match outcome {
                FetchOutcome::Success => {
                    state.consecutive_failures = 0;
                    Duration::from_millis(base_ms)
                }
                FetchOutcome::Failure => {
                    state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                    let factor = 2u64.saturating_pow(state.consecutive_failures);
                    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
                }
            },
            RatePolicy::TokenBucket {
                capacity,
                refill_ms,
            } => {
                let refill = Duration::from_millis(refill_ms.max(1));
                let now = Instant::now();
                let earned =
                    now.duration_since(state.last_refill).as_secs_f64() / refill.as_secs_f64();
                state.tokens = (state.tokens + earned).min(f64::from(capacity));
                state.last_refill = now;

                // Tokens may go negative; the pause pays the debt back.
                state.tokens -= 1.0;
                if state.tokens >= 0.0 {
                    Duration::ZERO
                } else {
                    refill.mul_f64(-state.tokens)
                }
            }
        }
    }

    /// Sleep for the pause owed after a request.
    pub async fn pause(&self, outcome: FetchOutcome) {
        let delay = self.next_delay(outcome);
        if !delay.is_zero() {
            log::trace!("Throttle: sleeping {} ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }
}
