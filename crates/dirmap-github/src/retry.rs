//! Retry policy with exponential backoff and rate-limit awareness.
//!
//! [`RetryPolicy`] decides whether a failed response is worth another attempt
//! and how long to wait first. A fresh [`RetryState`] tracks one outbound
//! request and is dropped once the request succeeds or the budget runs out.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use dirmap_core::RetryConfig;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Why a request is being retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// HTTP 429.
    RateLimited,
    /// Any 5xx status.
    ServerError(u16),
    /// Connection failure or timeout before a response arrived.
    Transport,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => f.write_str("rate limited (429)"),
            Self::ServerError(status) => write!(f, "server error ({status})"),
            Self::Transport => f.write_str("transport error"),
        }
    }
}

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter_factor: f64,
}

impl RetryPolicy {
    /// Default total attempts per request.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    /// Default delay before the second attempt.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    /// Default cap on any single delay.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
    /// Default jitter fraction.
    pub const DEFAULT_JITTER_FACTOR: f64 = 0.1;

    /// Create a policy with default cap and jitter.
    ///
    /// `max_attempts` counts the first attempt; zero is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Self::DEFAULT_MAX_DELAY.max(base_delay),
            jitter_factor: Self::DEFAULT_JITTER_FACTOR,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Set the cap on any single delay. Never below the base delay.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay.max(self.base_delay);
        self
    }

    /// Set the jitter fraction, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_jitter_factor(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = if jitter_factor.is_nan() {
            0.0
        } else {
            jitter_factor.clamp(0.0, 1.0)
        };
        self
    }

    /// Total attempts allowed per request.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Cap on any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Whether a response status is worth retrying.
    #[must_use]
    pub fn is_retryable(status: u16) -> bool {
        Self::classify(status).is_some()
    }

    /// Retry reason for a status, or `None` for permanent outcomes.
    #[must_use]
    pub fn classify(status: u16) -> Option<RetryReason> {
        match status {
            429 => Some(RetryReason::RateLimited),
            500..=599 => Some(RetryReason::ServerError(status)),
            _ => None,
        }
    }

    /// Exponential floor for `attempt` (1-based): `min(base × 2^(attempt−1), cap)`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 1_u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Delay before retrying after failed `attempt`.
    ///
    /// Without a hint the exponential floor is stretched by up to
    /// `jitter_factor × floor` (scaled by `jitter` in `[0, 1)`). With a
    /// rate-limit hint the wait is the hint, but never below the floor.
    /// Either way the result never exceeds the cap.
    #[must_use]
    pub fn delay(&self, attempt: u32, reset_hint: Option<Duration>, jitter: f64) -> Duration {
        let floor = self.backoff(attempt);
        let delay = match reset_hint {
            Some(hint) => hint.max(floor),
            None => {
                let jitter = if jitter.is_nan() {
                    0.0
                } else {
                    jitter.clamp(0.0, 1.0)
                };
                floor + floor.mul_f64(self.jitter_factor * jitter)
            }
        };
        delay.min(self.max_delay)
    }

    /// Start tracking a new request.
    #[must_use]
    pub const fn start(&self) -> RetryState {
        RetryState {
            attempt: 1,
            next_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
            .with_max_delay(config.max_delay())
            .with_jitter_factor(config.jitter_factor)
    }
}

/// Progress of a single request through its retry budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    next_delay: Duration,
}

impl RetryState {
    /// The attempt currently in flight (1-based).
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay chosen by the last call to [`RetryState::on_failure`].
    #[must_use]
    pub const fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Record that the current attempt failed.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when the
    /// budget is spent and the failure should surface to the caller.
    pub fn on_failure(
        &mut self,
        policy: &RetryPolicy,
        reason: RetryReason,
        reset_hint: Option<Duration>,
        jitter: f64,
    ) -> Option<Duration> {
        if self.attempt >= policy.max_attempts {
            tracing::warn!(
                attempt = self.attempt,
                max_attempts = policy.max_attempts,
                %reason,
                "giving up on GitHub request"
            );
            return None;
        }

        let delay = policy.delay(self.attempt, reset_hint, jitter);
        tracing::warn!(
            attempt = self.attempt,
            max_attempts = policy.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            %reason,
            "retrying GitHub request"
        );

        self.attempt += 1;
        self.next_delay = delay;
        Some(delay)
    }
}

/// How long GitHub asked us to wait, if it said.
///
/// Reads `retry-after` (delta seconds) first, then `x-ratelimit-reset`
/// (epoch seconds) when `x-ratelimit-remaining` is `0`. A reset already in
/// the past yields zero; one too far out to represent yields [`Duration::MAX`],
/// which [`RetryPolicy::delay`] caps.
#[must_use]
pub fn rate_limit_hint(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    if let Some(secs) = header_u64(headers, RETRY_AFTER.as_str()) {
        return Some(Duration::from_secs(secs));
    }

    if !is_rate_limit_exhausted(headers) {
        return None;
    }

    let reset_secs = header_u64(headers, "x-ratelimit-reset")?;
    let Some(reset) = UNIX_EPOCH.checked_add(Duration::from_secs(reset_secs)) else {
        return Some(Duration::MAX);
    };
    Some(reset.duration_since(now).unwrap_or(Duration::ZERO))
}

/// Whether GitHub reports no requests left in the current window.
#[must_use]
pub fn is_rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .is_some_and(|v| v == "0")
}

/// The rate-limit reset time as an RFC 3339 string, for log messages.
#[must_use]
pub fn rate_limit_reset_at(headers: &HeaderMap) -> Option<String> {
    let secs = i64::try_from(header_u64(headers, "x-ratelimit-reset")?).ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|t| t.to_rfc3339())
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
