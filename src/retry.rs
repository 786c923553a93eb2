use std::thread::sleep;
use std::time::Duration;

use rand::Rng;

use crate::error::ExecutionError;

/// Per-request stateful decision maker for whether another attempt is
/// allowed.
///
/// `retry` is handed the failure that ended the current attempt. Returning
/// `Ok(())` authorizes the next attempt, after the policy has applied
/// whatever backoff delay it wants; returning `Err` ends the retry loop and
/// the executor propagates that exact error to its caller. A policy instance
/// belongs to a single request and is never shared across requests.
pub trait RetryPolicy: Send {
    fn retry(&mut self, error: ExecutionError) -> Result<(), ExecutionError>;

    /// Transport timeout to apply to the next attempt. Transports may grow
    /// this between attempts; the executor never reads it.
    fn current_timeout(&self) -> Duration;

    /// Number of retries performed so far.
    fn current_retry_count(&self) -> usize;
}

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2500);
const DEFAULT_MAX_RETRIES: usize = 1;
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 1.0;

/// Default retry policy: a fixed attempt budget, a per-attempt timeout that
/// grows by a multiplier after each failure, and an optional jittered
/// backoff sleep between attempts.
#[derive(Clone, Debug)]
pub struct BackoffRetryPolicy {
    current_timeout: Duration,
    backoff_multiplier: f32,
    max_retries: usize,
    current_retry_count: usize,
    base_backoff: Duration,
    max_backoff: Duration,
    jitter_ratio: f64,
}

impl BackoffRetryPolicy {
    pub fn new() -> Self {
        Self {
            current_timeout: DEFAULT_TIMEOUT,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_retries: DEFAULT_MAX_RETRIES,
            current_retry_count: 0,
            base_backoff: Duration::ZERO,
            max_backoff: Duration::from_secs(2),
            jitter_ratio: 0.0,
        }
    }

    pub fn initial_timeout(mut self, timeout: Duration) -> Self {
        self.current_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Growth factor applied to the attempt timeout after each failure:
    /// `timeout += timeout * multiplier`.
    pub fn backoff_multiplier(mut self, multiplier: f32) -> Self {
        self.backoff_multiplier = multiplier.max(0.0);
        self
    }

    pub fn base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        if self.max_backoff < self.base_backoff {
            self.max_backoff = self.base_backoff;
        }
        self
    }

    pub fn max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff.max(self.base_backoff);
        self
    }

    pub fn jitter_ratio(mut self, jitter_ratio: f64) -> Self {
        self.jitter_ratio = jitter_ratio.clamp(0.0, 1.0);
        self
    }

    fn has_attempt_remaining(&self) -> bool {
        self.current_retry_count <= self.max_retries
    }

    fn backoff_for_retry(&self, retry_index: usize) -> Duration {
        if self.base_backoff.is_zero() {
            return Duration::ZERO;
        }
        let capped_exponent = retry_index.saturating_sub(1).min(31) as u32;
        let multiplier = 1_u128 << capped_exponent;
        let base_ms = self.base_backoff.as_millis().max(1);
        let max_ms = self.max_backoff.as_millis().max(base_ms);
        let delay_ms = base_ms
            .saturating_mul(multiplier)
            .min(max_ms)
            .min(u64::MAX as u128) as u64;
        self.apply_jitter(Duration::from_millis(delay_ms))
    }

    fn apply_jitter(&self, backoff: Duration) -> Duration {
        if self.jitter_ratio <= f64::EPSILON {
            return backoff;
        }
        let backoff_ms = backoff.as_millis().min(u64::MAX as u128) as u64;
        if backoff_ms <= 1 {
            return backoff;
        }
        let max_backoff_ms = self.max_backoff.as_millis().min(u64::MAX as u128) as u64;

        let jitter_span = ((backoff_ms as f64) * self.jitter_ratio).round().max(1.0) as u64;
        let low = backoff_ms.saturating_sub(jitter_span);
        let high = backoff_ms.saturating_add(jitter_span).max(low);
        let mut rng = rand::rng();
        let sampled_ms = rng.random_range(low..=high).min(max_backoff_ms.max(1));
        Duration::from_millis(sampled_ms)
    }
}

impl Default for BackoffRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy for BackoffRetryPolicy {
    fn retry(&mut self, error: ExecutionError) -> Result<(), ExecutionError> {
        self.current_retry_count += 1;
        self.current_timeout += self.current_timeout.mul_f32(self.backoff_multiplier);
        if !self.has_attempt_remaining() {
            return Err(error);
        }
        let delay = self.backoff_for_retry(self.current_retry_count);
        if !delay.is_zero() {
            sleep(delay);
        }
        Ok(())
    }

    fn current_timeout(&self) -> Duration {
        self.current_timeout
    }

    fn current_retry_count(&self) -> usize {
        self.current_retry_count
    }
}
