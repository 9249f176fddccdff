//! Bounded tokio channel implementing [`NotificationQueue`].

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::Notification;
use crate::domain::ports::{NotificationQueue, NotificationQueueError};

/// Producer half of the notification channel.
#[derive(Debug, Clone)]
pub struct ChannelNotificationQueue {
    sender: mpsc::Sender<Notification>,
}

impl ChannelNotificationQueue {
    /// Create a queue holding at most `capacity` pending notifications.
    ///
    /// The receiver is handed to the notification worker. A zero capacity is
    /// raised to one.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, notification: Notification) -> Result<(), NotificationQueueError> {
        self.sender.try_send(notification).map_err(|err| match err {
            TrySendError::Full(pending) => NotificationQueueError::full(format!(
                "dropping \"{}\" for {}",
                pending.title, pending.email
            )),
            TrySendError::Closed(pending) => NotificationQueueError::closed(format!(
                "dropping \"{}\" for {}",
                pending.title, pending.email
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Email;

    fn notification() -> Notification {
        Notification::account_verification(Email::new("ada@example.com").expect("email"), "t0k3n")
    }

    #[tokio::test]
    async fn delivers_in_order() {
        let (queue, mut receiver) = ChannelNotificationQueue::bounded(4);
        queue.enqueue(notification()).expect("enqueue");
        queue
            .enqueue(Notification::password_reset(
                Email::new("bola@example.com").expect("email"),
                "r3set",
            ))
            .expect("enqueue");
        assert_eq!(receiver.recv().await.map(|n| n.title), Some("Account Verification".to_owned()));
        assert_eq!(receiver.recv().await.map(|n| n.title), Some("Password Reset".to_owned()));
    }

    #[test]
    fn full_queue_is_reported() {
        let (queue, _receiver) = ChannelNotificationQueue::bounded(1);
        queue.enqueue(notification()).expect("first fits");
        let err = queue.enqueue(notification()).expect_err("second overflows");
        assert!(matches!(err, NotificationQueueError::Full { .. }));
    }

    #[test]
    fn closed_queue_is_reported() {
        let (queue, receiver) = ChannelNotificationQueue::bounded(1);
        drop(receiver);
        let err = queue.enqueue(notification()).expect_err("closed");
        assert!(matches!(err, NotificationQueueError::Closed { .. }));
    }
}
