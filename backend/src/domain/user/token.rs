//! Single-use verification, reset, and refresh tokens.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// Minimum token length.
pub const TOKEN_MIN: usize = 3;
/// Maximum token length.
pub const TOKEN_MAX: usize = 300;

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    Verification,
    ResetPassword,
    RefreshToken,
}

impl TokenType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::ResetPassword => "reset-password",
            Self::RefreshToken => "refresh-token",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unrecognised token type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTokenType(pub String);

impl fmt::Display for UnknownTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token type: {}", self.0)
    }
}

impl std::error::Error for UnknownTokenType {}

impl FromStr for TokenType {
    type Err = UnknownTokenType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "verification" => Ok(Self::Verification),
            "reset-password" => Ok(Self::ResetPassword),
            "refresh-token" => Ok(Self::RefreshToken),
            other => Err(UnknownTokenType(other.to_owned())),
        }
    }
}

/// Validation errors for [`TokenValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValueError {
    TooShort,
    TooLong,
}

impl fmt::Display for TokenValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "token must be at least {TOKEN_MIN} characters long"),
            Self::TooLong => write!(f, "token must not exceed {TOKEN_MAX} characters"),
        }
    }
}

impl std::error::Error for TokenValueError {}

/// Opaque token secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenValue(String);

impl TokenValue {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TokenValueError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < TOKEN_MIN {
            return Err(TokenValueError::TooShort);
        }
        if length > TOKEN_MAX {
            return Err(TokenValueError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TokenValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A token issued to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: Option<EntityId>,
    value: TokenValue,
    token_type: TokenType,
    user_id: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Token {
    #[must_use]
    pub fn new(
        value: TokenValue,
        token_type: TokenType,
        user_id: EntityId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            value,
            token_type,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: None,
        }
    }

    /// Builder-style expiry.
    #[must_use]
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// True iff an expiry is set and lies before `now`.
    #[must_use]
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    #[must_use]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    #[must_use]
    pub fn user_id(&self) -> EntityId {
        self.user_id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}
