//! Account domain service.
//!
//! Implements [`UserManagement`] over the user repository, notification
//! queue, access token, and secret generator ports. Emails are queued and
//! delivered by the notification worker, so request latency never includes
//! mail delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccessTokenError, AccessTokens, AuthTokenDto, ForgotPasswordResponse, LoginRequest,
    NotificationQueue, RegisterRequest, ResetPasswordRequest, SecretGenerator, UserDto, UserList,
    UserManagement, UserPersistenceError, UserRepository, VerifyUserRequest,
};
use crate::domain::{
    Email, EntityId, Error, FieldErrors, Name, Notification, PasswordHash, PasswordHashing, Token,
    TokenType,
    TokenValue, User, UserFilter, UserStatus,
};

/// Lifetime of account verification tokens.
pub const VERIFICATION_TOKEN_DAYS: i64 = 5;
/// Lifetime of password reset tokens.
pub const RESET_TOKEN_DAYS: i64 = 1;
/// Lifetime of issued access tokens.
pub const ACCESS_TOKEN_DAYS: i64 = 3;
/// Upper bound on the persistence work performed by registration.
pub const DEFAULT_REGISTRATION_TIMEOUT: Duration = Duration::from_secs(5);

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Port bundle required by [`UserManagementService`].
#[derive(Clone)]
pub struct UserManagementPorts {
    pub repo: Arc<dyn UserRepository>,
    pub notifications: Arc<dyn NotificationQueue>,
    pub access_tokens: Arc<dyn AccessTokens>,
    pub secrets: Arc<dyn SecretGenerator>,
}

/// Account service implementing the driving port.
#[derive(Clone)]
pub struct UserManagementService {
    repo: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationQueue>,
    access_tokens: Arc<dyn AccessTokens>,
    secrets: Arc<dyn SecretGenerator>,
    clock: Arc<dyn Clock>,
    hashing: PasswordHashing,
    registration_timeout: Duration,
}

impl UserManagementService {
    /// Create a new service with the given ports.
    pub fn new(ports: UserManagementPorts, clock: Arc<dyn Clock>, hashing: PasswordHashing) -> Self {
        Self {
            repo: ports.repo,
            notifications: ports.notifications,
            access_tokens: ports.access_tokens,
            secrets: ports.secrets,
            clock,
            hashing,
            registration_timeout: DEFAULT_REGISTRATION_TIMEOUT,
        }
    }

    /// Override the registration persistence timeout.
    #[must_use]
    pub fn with_registration_timeout(mut self, timeout: Duration) -> Self {
        self.registration_timeout = timeout;
        self
    }

    fn map_repository_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::conflict("a user with this email already exists")
            }
            UserPersistenceError::UserNotFound { .. } => Error::not_found("user not found"),
        }
    }

    fn map_access_token_error(error: AccessTokenError) -> Error {
        match error {
            AccessTokenError::Signing { message } => {
                Error::internal(format!("failed to issue access token: {message}"))
            }
            AccessTokenError::Expired | AccessTokenError::Invalid { .. } => {
                Error::unauthorized(error.to_string())
            }
        }
    }

    fn user_id(user: &User) -> Result<EntityId, Error> {
        user.id()
            .ok_or_else(|| Error::internal("user is missing an id"))
    }

    fn require_password(password: &str) -> Result<(), Error> {
        if password.trim().is_empty() {
            let mut errors = FieldErrors::new();
            errors.push("password", "password cannot be empty");
            return Err(errors.into());
        }
        Ok(())
    }

    /// Queue an email. Failures are logged and never fail the caller.
    fn notify(&self, notification: Notification) {
        let title = notification.title.clone();
        if let Err(error) = self.notifications.enqueue(notification) {
            warn!(%error, %title, "failed to queue notification");
        }
    }

    async fn require_user_by_email(&self, raw: &str) -> Result<User, Error> {
        let email = FieldErrors::require("email", Email::new(raw))?;
        self.repo
            .find_user_by_email(&email)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn require_user_by_id(&self, raw: i64) -> Result<User, Error> {
        let id = FieldErrors::require("id", EntityId::new(raw))?;
        self.repo
            .find_user_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Generate, persist, and return a new token for `user_id`.
    pub async fn create_token(
        &self,
        user_id: EntityId,
        token_type: TokenType,
        ttl: TimeDelta,
    ) -> Result<Token, Error> {
        let value = TokenValue::new(self.secrets.generate())
            .map_err(|err| Error::internal(format!("generated token is invalid: {err}")))?;
        let now = self.clock.utc();
        let token = Token::new(value, token_type, user_id, now).expiring_at(now + ttl);
        self.repo
            .create_token(&token)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Look up a token held by `user_id`. Unknown values are not found.
    pub async fn get_token(
        &self,
        user_id: EntityId,
        raw: &str,
        token_type: TokenType,
    ) -> Result<Token, Error> {
        let value = FieldErrors::require("token", TokenValue::new(raw))?;
        self.repo
            .find_token(user_id, &value, token_type)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("token not found"))
    }

    /// Delete a consumed token.
    pub async fn delete_token(&self, token: &Token) -> Result<(), Error> {
        let id = token
            .id()
            .ok_or_else(|| Error::internal("token is missing an id"))?;
        self.repo
            .delete_token(id)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Fetch a live token, rejecting expired ones.
    async fn consume_token(
        &self,
        user_id: EntityId,
        raw: &str,
        token_type: TokenType,
    ) -> Result<Token, Error> {
        let token = self.get_token(user_id, raw, token_type).await?;
        if token.has_expired(self.clock.utc()) {
            return Err(Error::invalid_request(format!("{token_type} token has expired")));
        }
        Ok(token)
    }

    fn issue_access_token(&self, user: &User) -> Result<AuthTokenDto, Error> {
        let user_id = Self::user_id(user)?;
        let issued_at = self.clock.utc();
        let ttl = TimeDelta::days(ACCESS_TOKEN_DAYS);
        let access_token = self
            .access_tokens
            .create_token(user_id, user.email(), issued_at, ttl)
            .map_err(Self::map_access_token_error)?;
        Ok(AuthTokenDto {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_at: issued_at + ttl,
            user: UserDto::try_from(user)?,
        })
    }

    async fn persist_registration(&self, user: User) -> Result<(User, Token), Error> {
        let created = self
            .repo
            .create_user(&user)
            .await
            .map_err(Self::map_repository_error)?;
        let token = self
            .create_token(
                Self::user_id(&created)?,
                TokenType::Verification,
                TimeDelta::days(VERIFICATION_TOKEN_DAYS),
            )
            .await?;
        Ok((created, token))
    }
}

impl UserManagementService {
    /// Argon2 is CPU-bound, so it runs on the blocking pool rather than an
    /// executor thread.
    async fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, Error> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let hashing = self.hashing;
        tokio::task::spawn_blocking(move || PasswordHash::compute(&plaintext, &hashing))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }
}

async fn password_matches(user: &User, plaintext: &str) -> Result<bool, Error> {
    let Some(hash) = user.password_hash().cloned() else {
        return Ok(false);
    };
    let plaintext = Zeroizing::new(plaintext.to_owned());
    tokio::task::spawn_blocking(move || hash.verify(&plaintext))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

#[async_trait]
impl UserManagement for UserManagementService {
    async fn register(&self, request: RegisterRequest) -> Result<UserDto, Error> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", Name::new(&request.name));
        let email = errors.check("email", Email::new(&request.email));
        if request.password.trim().is_empty() {
            errors.push("password", "password cannot be empty");
        }
        let (Some(name), Some(email)) = (name, email) else {
            return Err(errors.into());
        };
        errors.into_result()?;

        let now = self.clock.utc();
        let mut user = User::new(name, email, now);
        user.set_password_hash(self.hash_password(&request.password).await?, now);

        let (created, token) =
            tokio::time::timeout(self.registration_timeout, self.persist_registration(user))
                .await
                .map_err(|_| Error::service_unavailable("registration timed out"))??;

        self.notify(Notification::account_verification(
            created.email().clone(),
            token.value().as_ref(),
        ));
        let dto = UserDto::try_from(&created)?;
        info!(user_id = dto.id, "user registered");
        Ok(dto)
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthTokenDto, Error> {
        let Ok(email) = Email::new(&request.email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let user = self
            .repo
            .find_user_by_email(&email)
            .await
            .map_err(Self::map_repository_error)?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        if !password_matches(&user, &request.password).await? {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.issue_access_token(&user)
    }

    async fn verify_user(&self, request: VerifyUserRequest) -> Result<AuthTokenDto, Error> {
        let mut user = self.require_user_by_email(&request.email).await?;
        let user_id = Self::user_id(&user)?;
        let token = self
            .consume_token(user_id, &request.token, TokenType::Verification)
            .await?;

        user.mark_verified(self.clock.utc());
        let user = self
            .repo
            .update_user(&user)
            .await
            .map_err(Self::map_repository_error)?;
        self.delete_token(&token).await?;
        info!(user_id = user_id.value(), "user verified");
        self.issue_access_token(&user)
    }

    async fn resend_verification(&self, email: String) -> Result<(), Error> {
        let user = self.require_user_by_email(&email).await?;
        if user.is_verified() {
            return Err(Error::conflict("user is already verified"));
        }
        let user_id = Self::user_id(&user)?;
        self.repo
            .delete_tokens_for_user(user_id, TokenType::Verification)
            .await
            .map_err(Self::map_repository_error)?;
        let token = self
            .create_token(
                user_id,
                TokenType::Verification,
                TimeDelta::days(VERIFICATION_TOKEN_DAYS),
            )
            .await?;
        self.notify(Notification::account_verification(
            user.email().clone(),
            token.value().as_ref(),
        ));
        Ok(())
    }

    async fn forgot_password(&self, email: String) -> Result<ForgotPasswordResponse, Error> {
        let user = self.require_user_by_email(&email).await?;
        let token = self
            .create_token(
                Self::user_id(&user)?,
                TokenType::ResetPassword,
                TimeDelta::days(RESET_TOKEN_DAYS),
            )
            .await?;
        self.notify(Notification::password_reset(
            user.email().clone(),
            token.value().as_ref(),
        ));
        Ok(ForgotPasswordResponse {
            email: user.email().to_string(),
            token: token.value().to_string(),
        })
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error> {
        Self::require_password(&request.password)?;
        let mut user = self.require_user_by_email(&request.email).await?;
        let user_id = Self::user_id(&user)?;
        let token = self
            .consume_token(user_id, &request.token, TokenType::ResetPassword)
            .await?;

        let hash = self.hash_password(&request.password).await?;
        user.set_password_hash(hash, self.clock.utc());
        self.repo
            .update_user(&user)
            .await
            .map_err(Self::map_repository_error)?;
        self.delete_token(&token).await?;
        info!(user_id = user_id.value(), "password reset");
        Ok(())
    }

    async fn get_users(&self, filter: UserFilter) -> Result<UserList, Error> {
        let listing = self
            .repo
            .list_users(filter)
            .await
            .map_err(Self::map_repository_error)?;
        let users = listing
            .items
            .iter()
            .map(UserDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UserList {
            total: listing.total,
            users,
        })
    }

    async fn find_user_by_email(&self, email: String) -> Result<UserDto, Error> {
        let user = self.require_user_by_email(&email).await?;
        UserDto::try_from(&user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<UserDto, Error> {
        let user = self.require_user_by_id(id).await?;
        UserDto::try_from(&user)
    }

    async fn get_auth_user(&self, user_id: i64) -> Result<UserDto, Error> {
        let user = match self.require_user_by_id(user_id).await {
            Ok(user) => user,
            Err(error) if error.code() == crate::domain::ErrorCode::NotFound => {
                return Err(Error::unauthorized("user no longer exists"));
            }
            Err(error) => return Err(error),
        };
        if user.is_deleted() || user.status() != UserStatus::Active {
            return Err(Error::unauthorized("user is not active"));
        }
        UserDto::try_from(&user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
