//! Bearer token authentication for HTTP handlers.
//!
//! Handlers that require a signed-in caller take an [`AuthenticatedUser`]
//! argument. Extraction verifies the `Authorization: Bearer` header through
//! the [`AccessTokens`](crate::domain::ports::AccessTokens) port held in
//! [`HttpState`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::{AccessClaims, AccessTokenError};
use crate::domain::{Email, EntityId, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity established from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: EntityId,
    email: Email,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn user_id(&self) -> EntityId {
        self.user_id
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authorization header is missing"))?;
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is malformed"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

fn map_token_error(error: AccessTokenError) -> Error {
    match error {
        AccessTokenError::Expired => Error::unauthorized("access token has expired"),
        AccessTokenError::Invalid { message } => {
            debug!(%message, "rejected access token");
            Error::unauthorized("access token is invalid")
        }
        AccessTokenError::Signing { message } => Error::internal(message),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let token = bearer_token(req)?;
    state
        .access_tokens
        .verify_token(token)
        .map(AuthenticatedUser::from)
        .map_err(map_token_error)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
