//! Subscription plans, pricing, subscribers, and lifecycle classification.

mod lifecycle;
mod money;
mod plan;
mod subscriber;

pub use lifecycle::{ExpiryWindow, LifecycleState, LifecycleWindows, classify, select_active};
pub use money::{
    ConversionError, Currency, MAX_PRICE_AMOUNT, Price, PriceValidationError, UnknownCurrency,
    exchange_rate,
};
pub use plan::{
    DurationValidationError, Limit, LimitField, LimitParams, LimitValidationError,
    MAX_DURATION_SECONDS, MIN_DURATION_SECONDS, PlanDuration, SubscriptionPlan,
    SubscriptionPlanDraft, SubscriptionType, UnknownSubscriptionType,
};
pub use subscriber::{
    CreatedSubscription, NewSubscription, PaymentRecord, PlanFilter, Subscriber, SubscriberFilter,
    Subscription,
};
