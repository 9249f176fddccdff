//! Subscribers and their subscription records.

use chrono::{DateTime, Utc};

use super::lifecycle::{self, ExpiryWindow, LifecycleState};
use crate::domain::{Email, EntityId, Meta, Name, ProviderType};

/// Payment details recorded once a subscription has been paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub paid_at: DateTime<Utc>,
    pub transaction_id: String,
    pub provider: ProviderType,
}

/// Input for a new, unpaid subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub plan_id: EntityId,
    pub user_id: EntityId,
    pub expires_at: DateTime<Utc>,
}

/// One purchase of a plan by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: EntityId,
    pub plan_id: EntityId,
    pub user_id: EntityId,
    pub has_paid: bool,
    pub expires_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub payment_provider: Option<ProviderType>,
    pub meta: Option<Meta>,
}

impl Subscription {
    /// Build an unpaid subscription from persisted input.
    #[must_use]
    pub fn pending(id: EntityId, input: &NewSubscription) -> Self {
        Self {
            id,
            plan_id: input.plan_id,
            user_id: input.user_id,
            has_paid: false,
            expires_at: input.expires_at,
            paid_at: None,
            transaction_id: None,
            payment_provider: None,
            meta: None,
        }
    }

    /// Mark the subscription paid and populate the payment fields.
    pub fn record_payment(&mut self, record: PaymentRecord) {
        self.has_paid = true;
        self.paid_at = Some(record.paid_at);
        self.transaction_id = Some(record.transaction_id);
        self.payment_provider = Some(record.provider);
    }

    /// Lifecycle bucket at `now`, if any.
    #[must_use]
    pub fn lifecycle_state(&self, now: DateTime<Utc>) -> Option<LifecycleState> {
        lifecycle::classify(self, now)
    }
}

/// A user together with their subscription history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: EntityId,
    pub name: Name,
    pub email: Email,
    subscriptions: Vec<Subscription>,
}

impl Subscriber {
    /// Assemble a subscriber. Subscriptions keep the order given.
    #[must_use]
    pub fn new(id: EntityId, name: Name, email: Email, subscriptions: Vec<Subscription>) -> Self {
        Self {
            id,
            name,
            email,
            subscriptions,
        }
    }

    /// Subscriptions in persistence order.
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Replace the subscription list wholesale.
    pub fn replace_subscriptions(&mut self, subscriptions: Vec<Subscription>) {
        self.subscriptions = subscriptions;
    }

    /// The paid, unexpired subscription closest to expiry, if any.
    #[must_use]
    pub fn active_subscription(&self, now: DateTime<Utc>) -> Option<&Subscription> {
        lifecycle::select_active(&self.subscriptions, now)
    }
}

/// Subscriber listing filter.
///
/// A subscriber matches when at least one of their subscriptions satisfies
/// every populated criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberFilter {
    pub plan_id: Option<EntityId>,
    pub expiry: ExpiryWindow,
    pub has_paid: Option<bool>,
}

impl SubscriberFilter {
    /// Paid subscriptions of `plan_id` expiring within `window`.
    #[must_use]
    pub fn paid_within(plan_id: EntityId, window: ExpiryWindow) -> Self {
        Self {
            plan_id: Some(plan_id),
            expiry: window,
            has_paid: Some(true),
        }
    }

    /// Whether a single subscription satisfies the filter.
    #[must_use]
    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.plan_id.is_none_or(|id| id == subscription.plan_id)
            && self.has_paid.is_none_or(|paid| paid == subscription.has_paid)
            && self.expiry.contains(subscription.expires_at)
    }
}

/// Plan listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanFilter {
    pub is_active: Option<bool>,
}

/// Result of persisting a new subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSubscription {
    pub subscriber: Subscriber,
    pub subscription: Subscription,
}
