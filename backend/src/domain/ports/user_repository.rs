//! Port abstraction for user and token persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, EntityId, Listing, Token, TokenType, TokenValue, User, UserFilter};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
        UserNotFound { id: i64 } => "user {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned id.
    async fn create_user(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Replace a stored user.
    async fn update_user(&self, user: &User) -> Result<User, UserPersistenceError>;

    async fn find_user_by_id(&self, id: EntityId) -> Result<Option<User>, UserPersistenceError>;

    /// Case-insensitive email lookup.
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, UserPersistenceError>;

    async fn list_users(&self, filter: UserFilter) -> Result<Listing<User>, UserPersistenceError>;

    /// Insert a token and return it with its assigned id.
    async fn create_token(&self, token: &Token) -> Result<Token, UserPersistenceError>;

    async fn find_token(
        &self,
        user_id: EntityId,
        value: &TokenValue,
        token_type: TokenType,
    ) -> Result<Option<Token>, UserPersistenceError>;

    /// Delete one token. Deleting an unknown token is not an error.
    async fn delete_token(&self, token_id: EntityId) -> Result<(), UserPersistenceError>;

    /// Delete every token of `token_type` held by the user, returning the count.
    async fn delete_tokens_for_user(
        &self,
        user_id: EntityId,
        token_type: TokenType,
    ) -> Result<usize, UserPersistenceError>;
}
