//! Platform users and their credentials.

mod password;
mod token;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use password::{PasswordHash, PasswordHashError, PasswordHashing};
pub use token::{TOKEN_MAX, TOKEN_MIN, Token, TokenType, TokenValue, TokenValueError, UnknownTokenType};

use crate::domain::{Email, EntityId, Name};

/// Account status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unrecognised status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUserStatus(pub String);

impl fmt::Display for UnknownUserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown user status: {}", self.0)
    }
}

impl std::error::Error for UnknownUserStatus {}

impl FromStr for UserStatus {
    type Err = UnknownUserStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownUserStatus(other.to_owned())),
        }
    }
}

/// User listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub status: Option<UserStatus>,
}

/// A registered account.
///
/// Every mutation bumps `updated_at` to the supplied timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<EntityId>,
    name: Name,
    email: Email,
    status: UserStatus,
    password: Option<PasswordHash>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// A new, unverified, active user without a password.
    #[must_use]
    pub fn new(name: Name, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            email,
            status: UserStatus::default(),
            password: None,
            created_at: now,
            updated_at: now,
            verified_at: None,
            deleted_at: None,
        }
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Hash and store a new password.
    pub fn set_password(
        &mut self,
        plaintext: &str,
        hashing: &PasswordHashing,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordHashError> {
        let hash = PasswordHash::compute(plaintext, hashing)?;
        self.set_password_hash(hash, now);
        Ok(())
    }

    /// Store an already computed hash.
    pub fn set_password_hash(&mut self, hash: PasswordHash, now: DateTime<Utc>) {
        self.password = Some(hash);
        self.touch(now);
    }

    /// Whether `plaintext` matches the stored hash. Users without a password
    /// never match.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::{Email, Name, PasswordHashing, User};
    /// use chrono::Utc;
    ///
    /// let now = Utc::now();
    /// let mut user = User::new(
    ///     Name::new("Ada Obi").expect("name"),
    ///     Email::new("ada@example.com").expect("email"),
    ///     now,
    /// );
    /// assert!(!user.compare_password("hunter22"));
    /// user.set_password("hunter22", &PasswordHashing::testing(), now)
    ///     .expect("hash");
    /// assert!(user.compare_password("hunter22"));
    /// ```
    #[must_use]
    pub fn compare_password(&self, plaintext: &str) -> bool {
        self.password
            .as_ref()
            .is_some_and(|hash| hash.verify(plaintext))
    }

    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verified_at = Some(now);
        self.touch(now);
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.touch(now);
    }

    pub fn set_status(&mut self, status: UserStatus, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    pub fn set_email(&mut self, email: Email, now: DateTime<Utc>) {
        self.email = email;
        self.touch(now);
    }

    pub fn set_name(&mut self, name: Name, now: DateTime<Utc>) {
        self.name = name;
        self.touch(now);
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    #[must_use]
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password.as_ref()
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
    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
