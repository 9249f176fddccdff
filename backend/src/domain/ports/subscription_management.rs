//! Driving port for subscription plan and subscriber operations.
//!
//! Inbound adapters pass raw, unvalidated input; the service validates it
//! into domain values before touching persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Currency, Error, LimitParams, PlanFilter, ProviderType, Subscriber, Subscription,
    SubscriptionPlan, SubscriptionPlanDraft, SubscriptionType, Transaction,
};

/// Raw plan creation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: String,
    pub duration_in_days: i64,
    pub amount_in_usd: f64,
    pub limit: LimitParams,
    pub subscription_type: String,
    #[serde(default)]
    pub is_active: bool,
}

impl From<CreatePlanRequest> for SubscriptionPlanDraft {
    fn from(value: CreatePlanRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            duration_in_days: value.duration_in_days,
            amount_in_usd: value.amount_in_usd,
            limit: value.limit,
            subscription_type: value.subscription_type,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub amount: f64,
    pub currency: Currency,
}

/// Plan as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_in_days: i64,
    pub duration_in_seconds: i64,
    pub price: PriceDto,
    pub limit: LimitParams,
    pub subscription_type: SubscriptionType,
    pub is_active: bool,
}

impl TryFrom<&SubscriptionPlan> for PlanDto {
    type Error = Error;

    fn try_from(plan: &SubscriptionPlan) -> Result<Self, Self::Error> {
        let id = plan
            .id()
            .ok_or_else(|| Error::internal("subscription plan is missing an id"))?;
        Ok(Self {
            id: id.value(),
            name: plan.name().to_string(),
            description: plan.description().to_string(),
            duration_in_days: plan.duration().as_days(),
            duration_in_seconds: plan.duration().as_seconds(),
            price: PriceDto {
                amount: plan.price().amount(),
                currency: plan.price().currency(),
            },
            limit: plan.limit().to_params(),
            subscription_type: plan.subscription_type(),
            is_active: plan.is_active(),
        })
    }
}

/// Subscriber counts per lifecycle bucket.
///
/// Each count comes from a separate query, so the three values are not a
/// consistent snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberCount {
    pub active: usize,
    pub expired: usize,
    pub due: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetails {
    #[serde(flatten)]
    pub plan: PlanDto,
    pub subscribers: SubscriberCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanList {
    pub total: usize,
    pub result: Vec<PlanDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: i64,
    pub provider: ProviderType,
    pub payment_link: Option<String>,
    pub amount: PriceDto,
}

impl TryFrom<&Transaction> for TransactionDto {
    type Error = Error;

    fn try_from(transaction: &Transaction) -> Result<Self, Self::Error> {
        let id = transaction
            .id()
            .ok_or_else(|| Error::internal("transaction is missing an id"))?;
        Ok(Self {
            id: id.value(),
            provider: transaction.provider(),
            payment_link: transaction.payment_link().map(ToString::to_string),
            amount: PriceDto {
                amount: transaction.amount().amount(),
                currency: transaction.amount().currency(),
            },
        })
    }
}

/// Result of subscribing a user: the user, the plan, and the pending payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeUserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub plan: PlanDto,
    pub transaction: TransactionDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub id: i64,
    pub plan_id: i64,
    pub user_id: i64,
    pub has_paid: bool,
    pub expires_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub payment_provider: Option<ProviderType>,
}

impl From<&Subscription> for SubscriptionDto {
    fn from(value: &Subscription) -> Self {
        Self {
            id: value.id.value(),
            plan_id: value.plan_id.value(),
            user_id: value.user_id.value(),
            has_paid: value.has_paid,
            expires_at: value.expires_at,
            paid_at: value.paid_at,
            transaction_id: value.transaction_id.clone(),
            payment_provider: value.payment_provider,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subscriptions: Vec<SubscriptionDto>,
    /// Paid, unexpired subscription closest to expiry.
    pub active_subscription: Option<SubscriptionDto>,
}

impl SubscriberDto {
    /// Map a subscriber, selecting the active subscription at `now`.
    #[must_use]
    pub fn at(subscriber: &Subscriber, now: DateTime<Utc>) -> Self {
        Self {
            id: subscriber.id.value(),
            name: subscriber.name.to_string(),
            email: subscriber.email.to_string(),
            subscriptions: subscriber
                .subscriptions()
                .iter()
                .map(SubscriptionDto::from)
                .collect(),
            active_subscription: subscriber.active_subscription(now).map(SubscriptionDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberList {
    pub total: usize,
    pub subscribers: Vec<SubscriberDto>,
}

/// Raw subscriber listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberQuery {
    pub plan_id: Option<i64>,
    pub has_paid: Option<bool>,
    pub expires_from: Option<DateTime<Utc>>,
    pub expires_to: Option<DateTime<Utc>>,
}

/// Domain use-case port for plans and subscriptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionManagement: Send + Sync {
    async fn create_plan(&self, request: CreatePlanRequest) -> Result<PlanDto, Error>;

    /// Fetch a plan with its lifecycle counts.
    async fn get_plan(&self, id: i64) -> Result<PlanDetails, Error>;

    async fn get_plans_list(&self, filter: PlanFilter) -> Result<PlanList, Error>;

    /// Set the activation flag. Repeating the current value is a no-op.
    async fn activate_or_deactivate_plan(&self, id: i64, is_active: bool)
    -> Result<PlanDto, Error>;

    async fn delete_plan(&self, id: i64) -> Result<(), Error>;

    /// Create a pending subscription and initiate its payment.
    async fn subscribe_user_to_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<SubscribeUserResponse, Error>;

    /// Settle a transaction and record it on the subscription.
    async fn complete_subscription_payment(
        &self,
        transaction_id: i64,
    ) -> Result<SubscriptionDto, Error>;

    async fn get_subscribers_list(&self, query: SubscriberQuery) -> Result<SubscriberList, Error>;
}

