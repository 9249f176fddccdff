//! Email adapter that records deliveries in the structured log.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::Notification;
use crate::domain::ports::{EmailClient, EmailDeliveryError};

/// [`EmailClient`] for local runs: every message is logged instead of sent.
///
/// Message bodies carry one-time secrets, so they are only emitted at debug
/// level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl EmailClient for TracingMailer {
    async fn send(&self, notification: &Notification) -> Result<(), EmailDeliveryError> {
        info!(
            recipient = %notification.email,
            title = %notification.title,
            "email dispatched"
        );
        debug!(content = %notification.content, "email body");
        Ok(())
    }
}
