//! Shared harness wiring the real services over in-memory adapters.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use assessmate::domain::ports::{
    AccessTokens, InstitutionManagement, SubscriptionManagement, UserManagement,
};
use assessmate::domain::{
    InstitutionManagementService, Notification, PasswordHashing,
    SubscriptionManagementService, UserManagementPorts, UserManagementService,
};
use assessmate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use assessmate::inbound::http::state::{HttpState, HttpStatePorts};
use assessmate::inbound::http::{accounts, institutions, plans};
use assessmate::outbound::jwt::{JwtAccessTokens, JwtSettings};
use assessmate::outbound::memory::InMemoryStore;
use assessmate::outbound::notification_queue::ChannelNotificationQueue;
use assessmate::outbound::payment::{SandboxGatewaySettings, SandboxPaymentGateway};
use assessmate::outbound::secrets::RandomSecretGenerator;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::sync::mpsc;
use zeroize::Zeroizing;

pub const PASSWORD: &str = "hunter42";

/// HTTP state plus the outbox the services write notifications to.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub outbox: mpsc::Receiver<Notification>,
}

pub fn harness() -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let (queue, outbox) = ChannelNotificationQueue::bounded(16);
    let access_tokens: Arc<dyn AccessTokens> = Arc::new(JwtAccessTokens::new(
        &JwtSettings {
            secret: Zeroizing::new("integration-secret".to_owned()),
            issuer: "assessmate-tests".to_owned(),
        },
        clock.clone(),
    ));
    let users: Arc<dyn UserManagement> = Arc::new(UserManagementService::new(
        UserManagementPorts {
            repo: store.clone(),
            notifications: Arc::new(queue),
            access_tokens: access_tokens.clone(),
            secrets: Arc::new(RandomSecretGenerator),
        },
        clock.clone(),
        PasswordHashing::testing(),
    ));
    let gateway = Arc::new(SandboxPaymentGateway::new(
        SandboxGatewaySettings::default(),
        clock.clone(),
    ));
    let subscriptions: Arc<dyn SubscriptionManagement> = Arc::new(
        SubscriptionManagementService::new(store.clone(), gateway, clock.clone()),
    );
    let institutions: Arc<dyn InstitutionManagement> =
        Arc::new(InstitutionManagementService::new(store, clock));

    Harness {
        state: web::Data::new(HttpState::from(HttpStatePorts {
            subscriptions,
            users,
            institutions,
            access_tokens,
        })),
        outbox,
    }
}

/// Mount every API handler over `state`.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api/v1")
                .service(accounts::register)
                .service(accounts::verify)
                .service(accounts::login)
                .service(accounts::forgot_password)
                .service(accounts::reset_password)
                .service(accounts::resend_verification)
                .service(accounts::current_user)
                .service(accounts::list_users)
                .service(plans::create_plan)
                .service(plans::list_plans)
                .service(plans::get_plan)
                .service(plans::set_plan_status)
                .service(plans::delete_plan)
                .service(plans::subscribe)
                .service(plans::list_subscribers)
                .service(plans::complete_payment)
                .service(institutions::create_institution)
                .service(institutions::get_institution)
                .service(institutions::add_staff)
                .service(institutions::list_staff)
                .service(institutions::list_groups)
                .service(institutions::create_group)
                .service(institutions::add_staff_to_group),
        )
}

/// Issue `request` against a fresh app over `state` and decode the JSON body.
pub async fn call(state: &web::Data<HttpState>, request: test::TestRequest) -> (StatusCode, Value) {
    let service = test::init_service(app(state.clone())).await;
    let response = test::call_service(&service, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Pull the token out of the next queued email.
pub fn next_token(outbox: &mut mpsc::Receiver<Notification>) -> String {
    let notification = outbox.try_recv().expect("queued notification");
    notification
        .content
        .rsplit(' ')
        .next()
        .expect("token in content")
        .to_owned()
}

pub fn long_description() -> String {
    "Covers weekly assessments, printable material packs, and automated marking for a \
     whole class, with progress reports delivered to every teacher at the end of term."
        .to_owned()
}
