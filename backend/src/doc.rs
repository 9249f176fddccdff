//! The OpenAPI document served by Swagger UI in debug builds and printed by
//! the `openapi-dump` binary. Every handler in `inbound::http` and every DTO
//! it exchanges must be listed here.

use crate::domain::ports::{
    AddStaffRequest, AuthTokenDto, CreateGroupRequest, CreateInstitutionRequest,
    CreatePlanRequest, GroupDto, InstitutionDto, LoginRequest, PlanDetails, PlanDto,
    RegisterRequest, ResetPasswordRequest, StaffDto, SubscribeUserResponse, SubscriberDto,
    SubscriptionDto, TransactionDto, UserDto, VerifyUserRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/v1/auth/login or /auth/verify.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Assessmate backend API",
        description = "HTTP interface for subscription plans, accounts, and institutions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::verify,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::forgot_password,
        crate::inbound::http::accounts::reset_password,
        crate::inbound::http::accounts::resend_verification,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::list_users,
        crate::inbound::http::plans::create_plan,
        crate::inbound::http::plans::list_plans,
        crate::inbound::http::plans::get_plan,
        crate::inbound::http::plans::set_plan_status,
        crate::inbound::http::plans::delete_plan,
        crate::inbound::http::plans::subscribe,
        crate::inbound::http::plans::list_subscribers,
        crate::inbound::http::plans::complete_payment,
        crate::inbound::http::institutions::create_institution,
        crate::inbound::http::institutions::get_institution,
        crate::inbound::http::institutions::add_staff,
        crate::inbound::http::institutions::list_staff,
        crate::inbound::http::institutions::list_groups,
        crate::inbound::http::institutions::create_group,
        crate::inbound::http::institutions::add_staff_to_group,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        VerifyUserRequest,
        ResetPasswordRequest,
        UserDto,
        AuthTokenDto,
        CreatePlanRequest,
        PlanDto,
        PlanDetails,
        TransactionDto,
        SubscribeUserResponse,
        SubscriptionDto,
        SubscriberDto,
        CreateInstitutionRequest,
        AddStaffRequest,
        CreateGroupRequest,
        InstitutionDto,
        StaffDto,
        GroupDto,
    )),
    tags(
        (name = "auth", description = "Registration, verification, and sign-in"),
        (name = "users", description = "User administration"),
        (name = "plans", description = "Subscription plan catalogue"),
        (name = "subscriptions", description = "Subscribing and settling payments"),
        (name = "institutions", description = "Institutions, staff, and groups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
