//! Builders wiring adapters into services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tokio::sync::mpsc;

use assessmate::domain::ports::{
    AccessTokens, InstitutionManagement, SubscriptionManagement, UserManagement,
};
use assessmate::domain::{
    InstitutionManagementService, Notification, NotificationWorker,
    SubscriptionManagementService, UserManagementPorts, UserManagementService,
};
use assessmate::inbound::http::state::{HttpState, HttpStatePorts};
use assessmate::outbound::jwt::JwtAccessTokens;
use assessmate::outbound::mailer::TracingMailer;
use assessmate::outbound::memory::InMemoryStore;
use assessmate::outbound::notification_queue::ChannelNotificationQueue;
use assessmate::outbound::payment::SandboxPaymentGateway;
use assessmate::outbound::secrets::RandomSecretGenerator;

use super::ServerConfig;

/// HTTP state plus the background pieces that outlive a single worker.
pub(crate) struct ApplicationParts {
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) notifications: mpsc::Receiver<Notification>,
    pub(crate) worker: NotificationWorker,
}

/// Build every service over a shared in-memory store.
pub(crate) fn build_application(config: &ServerConfig) -> ApplicationParts {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let (queue, notifications) = ChannelNotificationQueue::bounded(config.queue_capacity);
    let access_tokens: Arc<dyn AccessTokens> =
        Arc::new(JwtAccessTokens::new(&config.jwt, clock.clone()));

    let mut users = UserManagementService::new(
        UserManagementPorts {
            repo: store.clone(),
            notifications: Arc::new(queue),
            access_tokens: access_tokens.clone(),
            secrets: Arc::new(RandomSecretGenerator),
        },
        clock.clone(),
        config.hashing,
    );
    if let Some(timeout) = config.registration_timeout {
        users = users.with_registration_timeout(timeout);
    }

    let gateway = Arc::new(SandboxPaymentGateway::new(
        config.gateway.clone(),
        clock.clone(),
    ));
    let subscriptions: Arc<dyn SubscriptionManagement> = Arc::new(
        SubscriptionManagementService::new(store.clone(), gateway, clock.clone()),
    );
    let institutions: Arc<dyn InstitutionManagement> =
        Arc::new(InstitutionManagementService::new(store, clock.clone()));
    let users: Arc<dyn UserManagement> = Arc::new(users);

    let worker = NotificationWorker::new(Arc::new(TracingMailer), clock, config.worker.clone());

    ApplicationParts {
        http_state: web::Data::new(HttpState::from(HttpStatePorts {
            subscriptions,
            users,
            institutions,
            access_tokens,
        })),
        notifications,
        worker,
    }
}
