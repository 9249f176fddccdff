//! [`UserRepository`] over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, EntityId, Listing, Token, TokenType, TokenValue, User, UserFilter};

use super::InMemoryStore;

fn query_error(err: impl ToString) -> UserPersistenceError {
    UserPersistenceError::query(err.to_string())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        if tables
            .users
            .values()
            .any(|existing| existing.email().matches(user.email()))
        {
            return Err(UserPersistenceError::duplicate_email(user.email().to_string()));
        }
        let id = tables.user_ids.next().map_err(query_error)?;
        let mut stored = user.clone();
        stored.assign_id(id);
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_user(&self, user: &User) -> Result<User, UserPersistenceError> {
        let id = user
            .id()
            .ok_or_else(|| UserPersistenceError::query("cannot update a user without an id"))?;
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        let slot = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| UserPersistenceError::user_not_found(id.value()))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn find_user_by_id(&self, id: EntityId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.email().matches(email))
            .cloned())
    }

    async fn list_users(&self, filter: UserFilter) -> Result<Listing<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        let users = tables
            .users
            .values()
            .filter(|user| filter.status.is_none_or(|status| user.status() == status))
            .cloned()
            .collect();
        Ok(Listing::complete(users))
    }

    async fn create_token(&self, token: &Token) -> Result<Token, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        if !tables.users.contains_key(&token.user_id()) {
            return Err(UserPersistenceError::user_not_found(token.user_id().value()));
        }
        let id = tables.token_ids.next().map_err(query_error)?;
        let mut stored = token.clone();
        stored.assign_id(id);
        tables.tokens.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_token(
        &self,
        user_id: EntityId,
        value: &TokenValue,
        token_type: TokenType,
    ) -> Result<Option<Token>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(tables
            .tokens
            .values()
            .find(|token| {
                token.user_id() == user_id
                    && token.token_type() == token_type
                    && token.value() == value
            })
            .cloned())
    }

    async fn delete_token(&self, token_id: EntityId) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        tables.tokens.remove(&token_id);
        Ok(())
    }

    async fn delete_tokens_for_user(
        &self,
        user_id: EntityId,
        token_type: TokenType,
    ) -> Result<usize, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        let before = tables.tokens.len();
        tables
            .tokens
            .retain(|_, token| !(token.user_id() == user_id && token.token_type() == token_type));
        Ok(before - tables.tokens.len())
    }
}
