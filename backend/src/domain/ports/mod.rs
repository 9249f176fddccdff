//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Management`) are implemented by domain services and
//! called by inbound adapters. Driven ports are implemented by outbound
//! adapters; each exposes a typed error generated by `define_port_error!`.

mod macros;
pub(crate) use macros::define_port_error;

mod access_tokens;
mod email_client;
mod institution_management;
mod institution_repository;
mod notification_queue;
mod payment_gateway;
mod secret_generator;
mod subscription_management;
mod subscription_repository;
mod user_management;
mod user_repository;

#[cfg(test)]
pub use access_tokens::MockAccessTokens;
pub use access_tokens::{AccessClaims, AccessTokenError, AccessTokens};
#[cfg(test)]
pub use email_client::MockEmailClient;
pub use email_client::{EmailClient, EmailDeliveryError};
#[cfg(test)]
pub use institution_management::MockInstitutionManagement;
pub use institution_management::{
    AddStaffRequest, AddStaffToGroupRequest, CreateGroupRequest, CreateInstitutionRequest,
    GroupDto, GroupList, InstitutionDto, InstitutionManagement, StaffDto, StaffList,
};
#[cfg(test)]
pub use institution_repository::MockInstitutionRepository;
pub use institution_repository::{InstitutionPersistenceError, InstitutionRepository};
#[cfg(test)]
pub use notification_queue::MockNotificationQueue;
pub use notification_queue::{NotificationQueue, NotificationQueueError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use secret_generator::MockSecretGenerator;
pub use secret_generator::SecretGenerator;
#[cfg(test)]
pub use subscription_management::MockSubscriptionManagement;
pub use subscription_management::{
    CreatePlanRequest, PlanDetails, PlanDto, PlanList, PriceDto, SubscribeUserResponse,
    SubscriberCount, SubscriberDto, SubscriberList, SubscriberQuery, SubscriptionDto,
    SubscriptionManagement, TransactionDto,
};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionPersistenceError, SubscriptionRepository};
#[cfg(test)]
pub use user_management::MockUserManagement;
pub use user_management::{
    AuthTokenDto, ForgotPasswordResponse, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UserDto, UserList, UserManagement, VerifyUserRequest,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
