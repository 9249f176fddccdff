//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AccessClaims, AccessTokenError, MockAccessTokens, MockInstitutionManagement,
    MockSubscriptionManagement, MockUserManagement,
};
use crate::domain::{Email, EntityId};
use crate::test_support::fixture_timestamp;

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`accepting_tokens`].
pub const VALID_TOKEN: &str = "valid-access-token";

/// Authorization header value carrying [`VALID_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {VALID_TOKEN}"))
}

/// Mock ports for handler tests. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct TestPorts {
    pub subscriptions: MockSubscriptionManagement,
    pub users: MockUserManagement,
    pub institutions: MockInstitutionManagement,
    pub access_tokens: MockAccessTokens,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::from(HttpStatePorts {
            subscriptions: Arc::new(self.subscriptions),
            users: Arc::new(self.users),
            institutions: Arc::new(self.institutions),
            access_tokens: Arc::new(self.access_tokens),
        }))
    }
}

pub fn claims_for(user_id: i64, expires_at: DateTime<Utc>) -> AccessClaims {
    AccessClaims {
        user_id: EntityId::new(user_id).expect("valid user id"),
        email: Email::new("ada@example.com").expect("valid email"),
        expires_at,
    }
}

/// Access tokens that accept [`VALID_TOKEN`] for `user_id` and reject anything else.
pub fn accepting_tokens(user_id: i64) -> MockAccessTokens {
    let mut tokens = MockAccessTokens::new();
    tokens.expect_verify_token().returning(move |token| {
        if token == VALID_TOKEN {
            Ok(claims_for(user_id, fixture_timestamp()))
        } else {
            Err(AccessTokenError::invalid("signature mismatch"))
        }
    });
    tokens
}
