//! Account API handlers: registration, verification, sign-in, and password reset.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada Obi","email":"ada@example.com","password":"hunter22"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"hunter22"}
//! GET /api/v1/auth/me (Authorization: Bearer <token>)
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    AuthTokenDto, LoginRequest, RegisterRequest, ResetPasswordRequest, UserDto, UserList,
    VerifyUserRequest,
};
use crate::domain::{FieldErrors, UserFilter, UserStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{Empty, Envelope};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Body for endpoints keyed only by an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// `active` or `inactive`.
    pub status: Option<String>,
}

fn parse_user_filter(query: UsersQuery) -> ApiResult<UserFilter> {
    let status = query
        .status
        .map(|raw| FieldErrors::require("status", UserStatus::from_str(&raw)))
        .transpose()?;
    Ok(UserFilter { status })
}

/// Register an unverified account and email its verification token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Envelope<UserDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    let user = state.users.register(request).await?;
    info!(user_id = user.id, "account registered");
    Ok(Envelope::new("user registered successfully, check your email to verify", user).created())
}

/// Consume a verification token and sign the user in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = VerifyUserRequest,
    responses(
        (status = 200, description = "Account verified", body = Envelope<AuthTokenDto>),
        (status = 400, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Unknown user or token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "verifyUser",
    security([])
)]
#[post("/auth/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    let token = state.users.verify_user(request).await?;
    Ok(Envelope::new("user verified successfully", token).ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Envelope<AuthTokenDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    let token = state.users.login(request).await?;
    Ok(Envelope::new("login successful", token).ok())
}

/// Start a password reset. The reset token only travels by email.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset email queued", body = Envelope<Empty>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown email", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    let EmailRequest { email } = payload.into_inner();
    state.validator.check_email(&email)?;
    let outcome = state.users.forgot_password(email).await?;
    info!(email = %outcome.email, "password reset requested");
    Ok(Envelope::acknowledge("password reset instructions sent to your email").ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = Envelope<Empty>),
        (status = 400, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Unknown user or token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    state.users.reset_password(request).await?;
    Ok(Envelope::acknowledge("password reset successfully").ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/resend-verification",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Verification email queued", body = Envelope<Empty>),
        (status = 404, description = "Unknown email", body = ErrorSchema),
        (status = 409, description = "Already verified", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resendVerification",
    security([])
)]
#[post("/auth/resend-verification")]
pub async fn resend_verification(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    let EmailRequest { email } = payload.into_inner();
    state.validator.check_email(&email)?;
    state.users.resend_verification(email).await?;
    Ok(Envelope::acknowledge("verification email sent").ok())
}

/// Return the account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = Envelope<UserDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let user = state.users.get_auth_user(user.user_id().value()).await?;
    Ok(Envelope::new("user fetched successfully", user).ok())
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UsersQuery),
    responses(
        (status = 200, description = "Users", body = Envelope<UserList>),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerToken" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    query: web::Query<UsersQuery>,
) -> ApiResult<HttpResponse> {
    let filter = parse_user_filter(query.into_inner())?;
    let users = state.users.get_users(filter).await?;
    Ok(Envelope::new("users fetched successfully", users).ok())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
