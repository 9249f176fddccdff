//! Outbound email notifications.

use crate::domain::{Email, TraceId};

/// A single email to deliver.
///
/// Notifications built inside a request remember its [`TraceId`], so the
/// delivery worker can log under the same identifier long after the
/// response has gone out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub email: Email,
    pub title: String,
    pub content: String,
    pub trace_id: Option<TraceId>,
}

impl Notification {
    fn compose(email: Email, title: &str, content: String) -> Self {
        Self {
            email,
            title: title.to_owned(),
            content,
            trace_id: TraceId::current(),
        }
    }

    /// Account verification email carrying `token`.
    #[must_use]
    pub fn account_verification(email: Email, token: &str) -> Self {
        Self::compose(
            email,
            "Account Verification",
            format!("Use this token to verify your account: {token}"),
        )
    }

    #[must_use]
    pub fn password_reset(email: Email, token: &str) -> Self {
        Self::compose(
            email,
            "Password Reset",
            format!("Use this token to reset your password: {token}"),
        )
    }
}
