//! Port abstraction for plan and subscriber persistence.
use async_trait::async_trait;

use crate::domain::{
    CreatedSubscription, EntityId, Listing, NewSubscription, PaymentRecord, PlanFilter,
    Subscriber, SubscriberFilter, Subscription, SubscriptionPlan,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by subscription repository adapters.
    pub enum SubscriptionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
        PlanNotFound { id: i64 } => "subscription plan {id} not found",
        UserNotFound { id: i64 } => "user {id} not found",
        SubscriptionNotFound { id: i64 } => "subscription {id} not found",
    }
}

/// Persistence for plans and the subscriptions sold against them.
///
/// Each call is independent; callers composing several calls get no
/// transactional guarantees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new plan and return it with its assigned id.
    async fn create_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, SubscriptionPersistenceError>;

    /// Replace a stored plan. Fails with `PlanNotFound` for unknown ids.
    async fn update_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, SubscriptionPersistenceError>;

    async fn find_plan_by_id(
        &self,
        id: EntityId,
    ) -> Result<Option<SubscriptionPlan>, SubscriptionPersistenceError>;

    async fn list_plans(
        &self,
        filter: PlanFilter,
    ) -> Result<Listing<SubscriptionPlan>, SubscriptionPersistenceError>;

    /// Remove a plan. Fails with `PlanNotFound` for unknown ids.
    async fn delete_plan(&self, id: EntityId) -> Result<(), SubscriptionPersistenceError>;

    /// Subscribers with at least one subscription matching `filter`.
    async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Listing<Subscriber>, SubscriptionPersistenceError>;

    /// Store an unpaid subscription for an existing user and plan.
    async fn create_subscription(
        &self,
        input: &NewSubscription,
    ) -> Result<CreatedSubscription, SubscriptionPersistenceError>;

    /// Mark a subscription paid.
    async fn record_subscription_payment(
        &self,
        subscription_id: EntityId,
        record: &PaymentRecord,
    ) -> Result<Subscription, SubscriptionPersistenceError>;
}
