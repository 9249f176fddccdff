//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokens, InstitutionManagement, SubscriptionManagement, UserManagement,
};

use super::validation::PayloadValidator;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub subscriptions: Arc<dyn SubscriptionManagement>,
    pub users: Arc<dyn UserManagement>,
    pub institutions: Arc<dyn InstitutionManagement>,
    pub access_tokens: Arc<dyn AccessTokens>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub subscriptions: Arc<dyn SubscriptionManagement>,
    pub users: Arc<dyn UserManagement>,
    pub institutions: Arc<dyn InstitutionManagement>,
    pub access_tokens: Arc<dyn AccessTokens>,
    pub validator: PayloadValidator,
}

impl HttpState {
    /// Construct state from a ports bundle and a payload validator.
    pub fn new(ports: HttpStatePorts, validator: PayloadValidator) -> Self {
        let HttpStatePorts {
            subscriptions,
            users,
            institutions,
            access_tokens,
        } = ports;
        Self {
            subscriptions,
            users,
            institutions,
            access_tokens,
            validator,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, PayloadValidator::default())
    }
}
