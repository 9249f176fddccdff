//! Subscription plan, subscriber, and payment handlers.
//!
//! ```text
//! POST /api/v1/plans
//! GET /api/v1/plans?isActive=true
//! POST /api/v1/plans/{id}/subscriptions (Authorization: Bearer <token>)
//! POST /api/v1/payments/{transactionId}/complete
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::PlanFilter;
use crate::domain::ports::{
    CreatePlanRequest, PlanDetails, PlanDto, PlanList, SubscribeUserResponse, SubscriberList,
    SubscriberQuery, SubscriptionDto,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{Empty, Envelope};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PlansQuery {
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SubscribersQuery {
    pub plan_id: Option<i64>,
    pub has_paid: Option<bool>,
    /// Inclusive lower bound on `expiresAt` (RFC 3339).
    pub expires_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `expiresAt` (RFC 3339).
    pub expires_to: Option<DateTime<Utc>>,
}

impl From<SubscribersQuery> for SubscriberQuery {
    fn from(value: SubscribersQuery) -> Self {
        Self {
            plan_id: value.plan_id,
            has_paid: value.has_paid,
            expires_from: value.expires_from,
            expires_to: value.expires_to,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = Envelope<PlanDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["plans"],
    operation_id = "createPlan"
)]
#[post("/plans")]
pub async fn create_plan(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePlanRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    let plan = state.subscriptions.create_plan(request).await?;
    info!(plan_id = plan.id, "subscription plan created");
    Ok(Envelope::new("subscription plan created successfully", plan).created())
}

#[utoipa::path(
    get,
    path = "/api/v1/plans",
    params(PlansQuery),
    responses(
        (status = 200, description = "Plans", body = Envelope<PlanList>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["plans"],
    operation_id = "listPlans"
)]
#[get("/plans")]
pub async fn list_plans(
    state: web::Data<HttpState>,
    query: web::Query<PlansQuery>,
) -> ApiResult<HttpResponse> {
    let filter = PlanFilter {
        is_active: query.is_active,
    };
    let plans = state.subscriptions.get_plans_list(filter).await?;
    Ok(Envelope::new("subscription plans fetched successfully", plans).ok())
}

/// Fetch a plan with its subscriber counts.
#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    params(("id" = i64, Path, description = "Plan identifier")),
    responses(
        (status = 200, description = "Plan", body = Envelope<PlanDetails>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Plan not found", body = ErrorSchema)
    ),
    tags = ["plans"],
    operation_id = "getPlan"
)]
#[get("/plans/{id}")]
pub async fn get_plan(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let plan = state.subscriptions.get_plan(path.into_inner()).await?;
    Ok(Envelope::new("subscription plan fetched successfully", plan).ok())
}

#[utoipa::path(
    patch,
    path = "/api/v1/plans/{id}/status",
    params(("id" = i64, Path, description = "Plan identifier")),
    request_body = PlanStatusRequest,
    responses(
        (status = 200, description = "Plan updated", body = Envelope<PlanDto>),
        (status = 404, description = "Plan not found", body = ErrorSchema)
    ),
    tags = ["plans"],
    operation_id = "setPlanStatus"
)]
#[patch("/plans/{id}/status")]
pub async fn set_plan_status(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PlanStatusRequest>,
) -> ApiResult<HttpResponse> {
    let plan = state
        .subscriptions
        .activate_or_deactivate_plan(path.into_inner(), payload.is_active)
        .await?;
    Ok(Envelope::new("subscription plan status updated", plan).ok())
}

#[utoipa::path(
    delete,
    path = "/api/v1/plans/{id}",
    params(("id" = i64, Path, description = "Plan identifier")),
    responses(
        (status = 200, description = "Plan deleted", body = Envelope<Empty>),
        (status = 404, description = "Plan not found", body = ErrorSchema)
    ),
    tags = ["plans"],
    operation_id = "deletePlan"
)]
#[delete("/plans/{id}")]
pub async fn delete_plan(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.subscriptions.delete_plan(id).await?;
    info!(plan_id = id, "subscription plan deleted");
    Ok(Envelope::acknowledge("subscription plan deleted successfully").ok())
}

/// Subscribe the signed-in user and return the checkout link.
#[utoipa::path(
    post,
    path = "/api/v1/plans/{id}/subscriptions",
    params(("id" = i64, Path, description = "Plan identifier")),
    responses(
        (status = 201, description = "Pending subscription", body = Envelope<SubscribeUserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Plan or user not found", body = ErrorSchema),
        (status = 409, description = "Plan is inactive", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribeToPlan",
    security(("BearerToken" = []))
)]
#[post("/plans/{id}/subscriptions")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let response = state
        .subscriptions
        .subscribe_user_to_plan(path.into_inner(), user.user_id().value())
        .await?;
    Ok(Envelope::new("subscription initiated, complete payment to activate", response).created())
}

#[utoipa::path(
    get,
    path = "/api/v1/subscribers",
    params(SubscribersQuery),
    responses(
        (status = 200, description = "Subscribers", body = Envelope<SubscriberList>),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscribers"
)]
#[get("/subscribers")]
pub async fn list_subscribers(
    state: web::Data<HttpState>,
    query: web::Query<SubscribersQuery>,
) -> ApiResult<HttpResponse> {
    let subscribers = state
        .subscriptions
        .get_subscribers_list(query.into_inner().into())
        .await?;
    Ok(Envelope::new("subscribers fetched successfully", subscribers).ok())
}

/// Settle a transaction and mark its subscription as paid.
#[utoipa::path(
    post,
    path = "/api/v1/payments/{transactionId}/complete",
    params(("transactionId" = i64, Path, description = "Transaction identifier")),
    responses(
        (status = 200, description = "Subscription paid", body = Envelope<SubscriptionDto>),
        (status = 404, description = "Transaction not found", body = ErrorSchema),
        (status = 409, description = "Payment rejected", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "completePayment"
)]
#[post("/payments/{transaction_id}/complete")]
pub async fn complete_payment(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let subscription = state
        .subscriptions
        .complete_subscription_payment(path.into_inner())
        .await?;
    Ok(Envelope::new("payment completed successfully", subscription).ok())
}

#[cfg(test)]
#[path = "plans_tests.rs"]
mod tests;
