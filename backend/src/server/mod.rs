//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::{ApplicationParts, build_application};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use assessmate::Trace;
#[cfg(debug_assertions)]
use assessmate::doc::ApiDoc;
use assessmate::inbound::http::accounts::{
    current_user, forgot_password, list_users, login, register, resend_verification,
    reset_password, verify,
};
use assessmate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use assessmate::inbound::http::health::{HealthState, live, ready};
use assessmate::inbound::http::institutions::{
    add_staff, add_staff_to_group, create_group, create_institution, get_institution,
    list_groups, list_staff,
};
use assessmate::inbound::http::plans::{
    complete_payment, create_plan, delete_plan, get_plan, list_plans, list_subscribers,
    set_plan_status, subscribe,
};
use assessmate::inbound::http::state::HttpState;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(register)
        .service(verify)
        .service(login)
        .service(forgot_password)
        .service(reset_password)
        .service(resend_verification)
        .service(current_user)
        .service(list_users)
        .service(create_plan)
        .service(list_plans)
        .service(get_plan)
        .service(set_plan_status)
        .service(delete_plan)
        .service(subscribe)
        .service(list_subscribers)
        .service(complete_payment)
        .service(create_institution)
        .service(get_institution)
        .service(add_staff)
        .service(list_staff)
        .service(list_groups)
        .service(create_group)
        .service(add_staff_to_group);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server and start the notification worker.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: resolved [`ServerConfig`].
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ApplicationParts {
        http_state,
        notifications,
        worker,
    } = build_application(&config);

    tokio::spawn(async move { worker.run(notifications).await });

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr())?
        .run();

    info!(addr = %config.bind_addr(), "server listening");
    health_state.mark_ready();
    Ok(server)
}
