//! Driven port for sending email.
use async_trait::async_trait;

use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by email adapters.
    pub enum EmailDeliveryError {
        /// Delivery failed in a way that may succeed later.
        Transient { message: String } => "email delivery failed temporarily: {message}",
        /// Provider refused the message.
        Rejected { message: String } => "email was rejected: {message}",
    }
}

impl EmailDeliveryError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), EmailDeliveryError>;
}
