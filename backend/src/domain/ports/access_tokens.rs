//! Driven port for issuing and verifying bearer access tokens.
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{Email, EntityId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by access token adapters.
    pub enum AccessTokenError {
        Expired => "access token has expired",
        Invalid { message: String } => "access token is invalid: {message}",
        Signing { message: String } => "failed to sign access token: {message}",
    }
}

/// Claims carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: EntityId,
    pub email: Email,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Sign a token for `user_id` valid for `ttl` from `issued_at`.
    fn create_token(
        &self,
        user_id: EntityId,
        email: &Email,
        issued_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<String, AccessTokenError>;

    fn verify_token(&self, token: &str) -> Result<AccessClaims, AccessTokenError>;
}
