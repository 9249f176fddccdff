//! Background delivery of queued notifications.
//!
//! The worker drains the notification channel and hands each email to the
//! [`EmailClient`] port, retrying transient failures with jittered
//! exponential backoff. Failures never reach the request that queued the
//! email; they are logged and the notification is dropped.
//!
//! Up to [`NotificationWorkerConfig::concurrency`] emails are in flight at
//! once, so one message backing off does not hold up the rest of the queue.
//! Delivery order is therefore not guaranteed once that bound exceeds one.
//! A mail outage longer than the retry budget still fills the bounded
//! channel, after which new notifications are rejected at enqueue time and
//! logged by the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use futures_util::stream;
use mockable::Clock;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::domain::ports::{EmailClient, EmailDeliveryError};
use crate::domain::{Error, Notification, TraceId};

mod runtime;

pub use runtime::{AttemptJitter, NotificationWorkerRuntime, TokioSleeper};

/// Retry policy. The delay before attempt `n + 1` is
/// `initial_backoff * 2^(n - 1)`, capped at `max_backoff`, plus jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationWorkerConfig {
    /// Sends per notification, counting the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Notifications delivered concurrently. Zero is treated as one.
    pub concurrency: usize,
}

impl Default for NotificationWorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            concurrency: 4,
        }
    }
}

/// Outcome of a successful [`NotificationWorker::deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationDelivery {
    pub attempts: u32,
}

/// Pause between attempts. Tests substitute a recorder so retries run
/// instantly.
#[async_trait]
pub trait NotificationSleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Spread for retry delays so a burst of failed sends does not retry in
/// lockstep.
///
/// ```
/// use std::time::Duration;
///
/// use assessmate::domain::{AttemptJitter, BackoffJitter};
/// use chrono::Utc;
///
/// let base = Duration::from_millis(400);
/// let delay = AttemptJitter.jittered_delay(base, 1, Utc::now());
/// assert!(delay >= base && delay <= base + base / 4);
/// ```
pub trait BackoffJitter: Send + Sync {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

/// Single consumer of the notification channel.
pub struct NotificationWorker {
    mailer: Arc<dyn EmailClient>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn NotificationSleeper>,
    jitter: Arc<dyn BackoffJitter>,
    config: NotificationWorkerConfig,
}

impl NotificationWorker {
    pub fn new(
        mailer: Arc<dyn EmailClient>,
        clock: Arc<dyn Clock>,
        config: NotificationWorkerConfig,
    ) -> Self {
        Self::with_runtime(mailer, clock, NotificationWorkerRuntime::default(), config)
    }

    /// Build a worker with a caller-supplied sleeper and jitter.
    pub fn with_runtime(
        mailer: Arc<dyn EmailClient>,
        clock: Arc<dyn Clock>,
        runtime: NotificationWorkerRuntime,
        config: NotificationWorkerConfig,
    ) -> Self {
        Self {
            mailer,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            config,
        }
    }

    /// Drain `receiver` until every sender has been dropped and every
    /// in-flight delivery has finished.
    pub async fn run(&self, receiver: mpsc::Receiver<Notification>) {
        let limit = self.config.concurrency.max(1);
        info!(concurrency = limit, "notification worker started");
        stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|next| (next, receiver))
        })
        .for_each_concurrent(limit, |notification| self.deliver_and_log(notification))
        .await;
        info!("notification worker stopped");
    }

    async fn deliver_and_log(&self, notification: Notification) {
        let trace_id = notification.trace_id;
        let outcome = TraceId::maybe_scope(trace_id, self.deliver(&notification)).await;
        let trace = trace_id.map(|id| id.to_string());
        match outcome {
            Ok(delivery) => info!(
                title = %notification.title,
                trace_id = trace.as_deref(),
                attempts = delivery.attempts,
                "notification delivered"
            ),
            Err(err) => error!(
                title = %notification.title,
                trace_id = trace.as_deref(),
                error = %err,
                "notification dropped"
            ),
        }
    }

    /// Send one notification, retrying transient failures.
    pub async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<NotificationDelivery, Error> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.mailer.send(notification).await {
                Ok(()) => return Ok(NotificationDelivery { attempts: attempt }),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        title = %notification.title,
                        attempt,
                        error = %err,
                        "notification send failed, retrying"
                    );
                    let base_delay = self.retry_base_delay(attempt);
                    let jittered = self
                        .jitter
                        .jittered_delay(base_delay, attempt, self.clock.utc());
                    self.sleeper.sleep(jittered).await;
                    attempt += 1;
                }
                Err(err) => return Err(map_delivery_error(&err, attempt)),
            }
        }
    }

    fn retry_base_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.config.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.config.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

fn map_delivery_error(error: &EmailDeliveryError, attempts: u32) -> Error {
    match error {
        EmailDeliveryError::Transient { message } => Error::service_unavailable(format!(
            "notification delivery failed after {attempts} attempts: {message}"
        )),
        EmailDeliveryError::Rejected { message } => {
            Error::invalid_request(format!("notification rejected by mail provider: {message}"))
        }
    }
}
