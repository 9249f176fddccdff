//! Domain port for handing notifications to the background sender.
use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced when a notification cannot be queued.
    pub enum NotificationQueueError {
        /// Queue is at capacity.
        Full { message: String } => "notification queue is full: {message}",
        /// Consumer has shut down.
        Closed { message: String } => "notification queue is closed: {message}",
    }
}

/// Non-blocking notification hand-off.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, notification: Notification) -> Result<(), NotificationQueueError>;
}
