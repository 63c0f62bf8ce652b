//! Retry policy and attempt classification for the blocking client.
//!
//! Backoff is exponential without jitter or cap: attempt `n` (0-indexed) is
//! followed by a sleep of `backoff_base * 2^n` when another attempt remains.

use crate::transport::TransportResponse;
use crate::Error;
use http::StatusCode;
use std::time::Duration;

/// Default total number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default backoff base delay.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// How many times to attempt a request and how long to wait between attempts.
///
/// # Examples
///
/// ```
/// use homebound::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(4, Duration::from_millis(100));
///
/// assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    backoff_base: Duration,
}

impl RetryPolicy {
    /// Creates a policy. A `max_attempts` of zero is treated as one.
    pub fn new(max_attempts: usize, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total number of attempts, always at least one.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Base delay for the first backoff.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Returns the delay to wait after the given attempt (0-indexed) fails.
    ///
    /// A zero base never waits; otherwise the delay saturates at
    /// [`Duration::MAX`].
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if self.backoff_base.is_zero() {
            return Duration::ZERO;
        }

        u32::try_from(attempt)
            .ok()
            .and_then(|exp| 2u128.checked_pow(exp))
            .and_then(|multiplier| self.backoff_base.as_nanos().checked_mul(multiplier))
            .and_then(|nanos| {
                let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
                Some(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
            })
            .unwrap_or(Duration::MAX)
    }

    /// Returns `true` if `attempt` (0-indexed) is the final one.
    pub fn is_last_attempt(&self, attempt: usize) -> bool {
        attempt + 1 >= self.max_attempts
    }

    /// Applies per-call overrides on top of this policy.
    pub(crate) fn with_overrides(
        self,
        max_attempts: Option<usize>,
        backoff_base: Option<Duration>,
    ) -> Self {
        Self::new(
            max_attempts.unwrap_or(self.max_attempts),
            backoff_base.unwrap_or(self.backoff_base),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE)
    }
}

/// The result of a single attempt, classified for the retry loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A response that must be returned as-is.
    Complete(TransportResponse),
    /// A transient failure: a 502 response or a transport fault. Retried while
    /// attempts remain, otherwise surfaced unchanged.
    Transient(Result<TransportResponse, Error>),
    /// An error that is never retried.
    Terminal(Error),
}

impl AttemptOutcome {
    /// Classifies the result of one transport call.
    pub fn classify(result: Result<TransportResponse, Error>) -> Self {
        match result {
            Ok(response) if response.status == StatusCode::BAD_GATEWAY => {
                AttemptOutcome::Transient(Ok(response))
            }
            Ok(response) => AttemptOutcome::Complete(response),
            Err(e) if e.is_transport_fault() => AttemptOutcome::Transient(Err(e)),
            Err(e) => AttemptOutcome::Terminal(e),
        }
    }
}

/// Blocks the calling thread between attempts.
pub trait Sleeper: Send + Sync {
    /// Sleeps for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff_delays() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(16000));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(80), Duration::MAX);
        assert_eq!(policy.delay_for_attempt(usize::MAX), Duration::MAX);
    }

    #[test]
    fn test_zero_base_never_waits() {
        let policy = RetryPolicy::new(40, Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(31), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(32), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(200), Duration::ZERO);
    }

    #[test]
    fn test_tiny_base_past_32_doublings() {
        let policy = RetryPolicy::new(40, Duration::from_nanos(1));
        assert_eq!(policy.delay_for_attempt(32), Duration::from_nanos(1 << 32));
        assert_eq!(
            policy.delay_for_attempt(39),
            Duration::new(549, 755_813_888)
        );
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts(), 1);
        assert!(policy.is_last_attempt(0));
    }

    #[test]
    fn test_last_attempt() {
        let policy = RetryPolicy::default();
        assert!(!policy.is_last_attempt(0));
        assert!(!policy.is_last_attempt(1));
        assert!(policy.is_last_attempt(2));
    }

    #[test]
    fn test_overrides() {
        let policy = RetryPolicy::default().with_overrides(Some(2), None);
        assert_eq!(policy.max_attempts(), 2);
        assert_eq!(policy.backoff_base(), DEFAULT_BACKOFF_BASE);
    }

    #[test]
    fn test_classify() {
        let ok = TransportResponse::new(StatusCode::OK, "{}");
        assert!(matches!(
            AttemptOutcome::classify(Ok(ok)),
            AttemptOutcome::Complete(_)
        ));

        let unavailable = TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(matches!(
            AttemptOutcome::classify(Ok(unavailable)),
            AttemptOutcome::Complete(_)
        ));

        let bad_gateway = TransportResponse::new(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(
            AttemptOutcome::classify(Ok(bad_gateway)),
            AttemptOutcome::Transient(Ok(_))
        ));

        assert!(matches!(
            AttemptOutcome::classify(Err(Error::Timeout)),
            AttemptOutcome::Transient(Err(Error::Timeout))
        ));

        assert!(matches!(
            AttemptOutcome::classify(Err(Error::ConfigurationError("x".into()))),
            AttemptOutcome::Terminal(_)
        ));
    }
}
