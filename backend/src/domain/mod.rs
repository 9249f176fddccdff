//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities and the application services that
//! orchestrate them through ports. Value objects validate on construction and
//! cannot exist in an invalid state; entities mutate only through named
//! methods that keep their timestamps current.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Value objects: `EntityId`, `Name`, `Description`, `Email`, `Price`.
//! - Aggregates: `SubscriptionPlan`, `Subscriber`, `User`, `Institution`.
//! - Services: `SubscriptionManagementService`, `UserManagementService`,
//!   `InstitutionManagementService`, `NotificationWorker`.

pub mod error;
pub mod institution;
pub mod notification;
pub mod notification_worker;
pub mod payment;
pub mod ports;
pub mod subscription;
pub mod trace_id;
pub mod user;
pub mod validation;
pub mod values;

mod institution_service;
mod subscription_service;
mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::institution::{
    Course, Group, Institution, Staff, StaffStatus, UnknownStaffStatus,
};
pub use self::institution_service::InstitutionManagementService;
pub use self::notification::Notification;
pub use self::notification_worker::{
    AttemptJitter, BackoffJitter, NotificationDelivery, NotificationSleeper, NotificationWorker,
    NotificationWorkerConfig, NotificationWorkerRuntime, TokioSleeper,
};
pub use self::payment::{
    InvalidPaymentLink, Meta, MetaError, PaymentLink, ProviderType, Transaction,
    TransactionEntity, TransactionEntityKind, UnknownProvider,
};
pub use self::subscription::{
    ConversionError, CreatedSubscription, Currency, DurationValidationError, ExpiryWindow,
    LifecycleState, LifecycleWindows, Limit, LimitField, LimitParams, LimitValidationError,
    MAX_DURATION_SECONDS, MAX_PRICE_AMOUNT, MIN_DURATION_SECONDS, NewSubscription, PaymentRecord,
    PlanDuration, PlanFilter, Price, PriceValidationError, Subscriber, SubscriberFilter,
    Subscription, SubscriptionPlan, SubscriptionPlanDraft, SubscriptionType, UnknownCurrency,
    UnknownSubscriptionType, classify, exchange_rate, select_active,
};
pub use self::subscription_service::SubscriptionManagementService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    PasswordHash, PasswordHashError, PasswordHashing, TOKEN_MAX, TOKEN_MIN, Token, TokenType,
    TokenValue, TokenValueError, UnknownTokenType, UnknownUserStatus, User, UserFilter,
    UserStatus,
};
pub use self::user_service::{
    ACCESS_TOKEN_DAYS, DEFAULT_REGISTRATION_TIMEOUT, RESET_TOKEN_DAYS, UserManagementPorts,
    UserManagementService, VERIFICATION_TOKEN_DAYS,
};
pub use self::validation::{FieldError, FieldErrors};
pub use self::values::{
    DESCRIPTION_MAX, DESCRIPTION_MIN, Description, Email, EmailValidationError, EntityId,
    IdValidationError, Listing, NAME_MAX, NAME_MIN, Name, TextValidationError,
};

