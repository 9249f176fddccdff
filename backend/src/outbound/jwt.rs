//! HS256 bearer tokens implementing [`AccessTokens`].
//!
//! Expiry is checked against the injected clock rather than system time so
//! issuance and verification agree on "now".

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{AccessClaims, AccessTokenError, AccessTokens};
use crate::domain::{Email, EntityId};

/// Signing settings for [`JwtAccessTokens`].
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: Zeroizing<String>,
    pub issuer: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iss: String,
    iat: i64,
    exp: i64,
}

pub struct JwtAccessTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl JwtAccessTokens {
    pub fn new(settings: &JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            clock,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = false;
        validation
    }
}

fn parse_claims(claims: Claims) -> Result<AccessClaims, AccessTokenError> {
    let user_id = claims
        .sub
        .parse::<i64>()
        .ok()
        .and_then(|raw| EntityId::new(raw).ok())
        .ok_or_else(|| AccessTokenError::invalid("subject is not a user id"))?;
    let email = Email::new(&claims.email)
        .map_err(|err| AccessTokenError::invalid(format!("email claim: {err}")))?;
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AccessTokenError::invalid("expiry is out of range"))?;
    Ok(AccessClaims {
        user_id,
        email,
        expires_at,
    })
}

impl AccessTokens for JwtAccessTokens {
    fn create_token(
        &self,
        user_id: EntityId,
        email: &Email,
        issued_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<String, AccessTokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AccessTokenError::signing(err.to_string()))
    }

    fn verify_token(&self, token: &str) -> Result<AccessClaims, AccessTokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::Expired,
                _ => AccessTokenError::invalid(err.to_string()),
            },
        )?;
        let claims = parse_claims(data.claims)?;
        if claims.expires_at <= self.clock.utc() {
            return Err(AccessTokenError::Expired);
        }
        Ok(claims)
    }
}
