//! Driving port for account registration, authentication, and lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User, UserFilter, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUserRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
}

/// User as returned to callers. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl TryFrom<&User> for UserDto {
    type Error = Error;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        let id = user
            .id()
            .ok_or_else(|| Error::internal("user is missing an id"))?;
        Ok(Self {
            id: id.value(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            status: user.status(),
            is_verified: user.is_verified(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            verified_at: user.verified_at(),
        })
    }
}

/// Issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

/// Outcome of a password reset request.
///
/// `token` is for in-process callers only and is not echoed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgotPasswordResponse {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub total: usize,
    pub users: Vec<UserDto>,
}

/// Domain use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserManagement: Send + Sync {
    /// Create an unverified account and send its verification email.
    async fn register(&self, request: RegisterRequest) -> Result<UserDto, Error>;

    async fn login(&self, request: LoginRequest) -> Result<AuthTokenDto, Error>;

    /// Consume a verification token and sign the user in.
    async fn verify_user(&self, request: VerifyUserRequest) -> Result<AuthTokenDto, Error>;

    /// Replace outstanding verification tokens and resend the email.
    async fn resend_verification(&self, email: String) -> Result<(), Error>;

    async fn forgot_password(&self, email: String) -> Result<ForgotPasswordResponse, Error>;

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error>;

    async fn get_users(&self, filter: UserFilter) -> Result<UserList, Error>;

    async fn find_user_by_email(&self, email: String) -> Result<UserDto, Error>;

    async fn find_user_by_id(&self, id: i64) -> Result<UserDto, Error>;

    /// Resolve the caller behind a verified access token.
    async fn get_auth_user(&self, user_id: i64) -> Result<UserDto, Error>;
}
