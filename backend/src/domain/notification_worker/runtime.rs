//! Production sleeper and jitter used when the worker is built with
//! [`NotificationWorker::new`](super::NotificationWorker::new).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{BackoffJitter, NotificationSleeper};

/// Time-related collaborators of the retry loop, swappable in tests.
pub struct NotificationWorkerRuntime {
    pub sleeper: Arc<dyn NotificationSleeper>,
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for NotificationWorkerRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(AttemptJitter),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl NotificationSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds between zero and a quarter of `base`, drawn from a small RNG seeded
/// by the clock and the attempt number. The same inputs give the same delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttemptJitter;

impl BackoffJitter for AttemptJitter {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration {
        let seed = now
            .timestamp_nanos_opt()
            .map_or(0, i64::unsigned_abs)
            .rotate_left(attempt);
        let ceiling = base / 4;
        if ceiling.is_zero() {
            return base;
        }
        let extra = SmallRng::seed_from_u64(seed).gen_range(Duration::ZERO..=ceiling);
        base.saturating_add(extra)
    }
}
