//! Time source used by the retry loop.
//!
//! Injected so tests can observe backoff delays without sleeping.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall time, sleeping, and the jitter draw for backoff.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// A value in `[0, 1)` used to spread retries.
    ///
    /// Defaults to the sub-second fraction of [`Clock::now`], so a fixed
    /// clock yields fixed jitter.
    fn jitter(&self) -> f64 {
        let nanos = self
            .now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.subsec_nanos());
        f64::from(nanos) / 1_000_000_000.0
    }
}

/// The real clock, backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
