//! Subscription plan domain service.
//!
//! Implements [`SubscriptionManagement`] over the subscription repository and
//! payment gateway ports. Multi-call operations (plan lookup before delete,
//! the three lifecycle counts) are independent round trips and are not
//! atomic.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CreatePlanRequest, PaymentGateway, PaymentGatewayError, PlanDetails, PlanDto, PlanList,
    SubscribeUserResponse, SubscriberCount, SubscriberDto, SubscriberList, SubscriberQuery,
    SubscriptionDto, SubscriptionManagement, SubscriptionPersistenceError,
    SubscriptionRepository, TransactionDto,
};
use crate::domain::{
    EntityId, Error, ExpiryWindow, FieldErrors, LifecycleWindows, NewSubscription, PaymentRecord,
    PlanFilter, SubscriberFilter, SubscriptionPlan, Transaction, TransactionEntity,
    TransactionEntityKind,
};

/// Plan and subscriber service implementing the driving port.
#[derive(Clone)]
pub struct SubscriptionManagementService<R, P> {
    repo: Arc<R>,
    payments: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> SubscriptionManagementService<R, P> {
    /// Create a new service with the given ports.
    pub fn new(repo: Arc<R>, payments: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            payments,
            clock,
        }
    }
}

impl<R, P> SubscriptionManagementService<R, P>
where
    R: SubscriptionRepository,
    P: PaymentGateway,
{
    fn map_repository_error(error: SubscriptionPersistenceError) -> Error {
        match error {
            SubscriptionPersistenceError::Connection { message } => Error::service_unavailable(
                format!("subscription repository unavailable: {message}"),
            ),
            SubscriptionPersistenceError::Query { message } => {
                Error::internal(format!("subscription repository error: {message}"))
            }
            SubscriptionPersistenceError::PlanNotFound { .. } => {
                Error::not_found("subscription plan not found")
            }
            SubscriptionPersistenceError::UserNotFound { .. } => Error::not_found("user not found"),
            SubscriptionPersistenceError::SubscriptionNotFound { .. } => {
                Error::not_found("subscription not found")
            }
        }
    }

    fn map_payment_error(error: PaymentGatewayError) -> Error {
        match error {
            PaymentGatewayError::Unavailable { message } => {
                Error::service_unavailable(format!("payment provider unavailable: {message}"))
            }
            PaymentGatewayError::Rejected { message } => {
                Error::conflict(format!("payment was rejected: {message}"))
            }
            PaymentGatewayError::TransactionNotFound { .. } => {
                Error::not_found("transaction not found")
            }
        }
    }

    async fn require_plan(&self, id: EntityId) -> Result<SubscriptionPlan, Error> {
        self.repo
            .find_plan_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("subscription plan not found"))
    }

    async fn count_within(&self, plan_id: EntityId, window: ExpiryWindow) -> Result<usize, Error> {
        self.repo
            .list_subscribers(&SubscriberFilter::paid_within(plan_id, window))
            .await
            .map(|listing| listing.total)
            .map_err(Self::map_repository_error)
    }

    /// Count active, expired, and due subscribers with three separate queries.
    async fn count_subscribers(&self, plan_id: EntityId) -> Result<SubscriberCount, Error> {
        let windows = LifecycleWindows::at(self.clock.utc());
        Ok(SubscriberCount {
            active: self.count_within(plan_id, windows.active).await?,
            expired: self.count_within(plan_id, windows.expired).await?,
            due: self.count_within(plan_id, windows.due).await?,
        })
    }

    fn subscriber_filter(query: SubscriberQuery) -> Result<SubscriberFilter, Error> {
        let mut errors = FieldErrors::new();
        let plan_id = query
            .plan_id
            .and_then(|raw| errors.check("planId", EntityId::new(raw)));
        if matches!(
            (query.expires_from, query.expires_to),
            (Some(from), Some(to)) if from > to
        ) {
            errors.push("expiresFrom", "expiresFrom must not be after expiresTo");
        }
        errors.into_result()?;
        Ok(SubscriberFilter {
            plan_id,
            expiry: ExpiryWindow {
                from: query.expires_from,
                to: query.expires_to,
            },
            has_paid: query.has_paid,
        })
    }
}

#[async_trait]
impl<R, P> SubscriptionManagement for SubscriptionManagementService<R, P>
where
    R: SubscriptionRepository,
    P: PaymentGateway,
{
    async fn create_plan(&self, request: CreatePlanRequest) -> Result<PlanDto, Error> {
        let plan = SubscriptionPlan::new(request.into())?;
        let created = self
            .repo
            .create_plan(&plan)
            .await
            .map_err(Self::map_repository_error)?;
        let dto = PlanDto::try_from(&created)?;
        info!(plan_id = dto.id, name = %dto.name, "subscription plan created");
        Ok(dto)
    }

    async fn get_plan(&self, id: i64) -> Result<PlanDetails, Error> {
        let id = FieldErrors::require("id", EntityId::new(id))?;
        let plan = self.require_plan(id).await?;
        let subscribers = self.count_subscribers(id).await?;
        Ok(PlanDetails {
            plan: PlanDto::try_from(&plan)?,
            subscribers,
        })
    }

    async fn get_plans_list(&self, filter: PlanFilter) -> Result<PlanList, Error> {
        let listing = self
            .repo
            .list_plans(filter)
            .await
            .map_err(Self::map_repository_error)?;
        let result = listing
            .items
            .iter()
            .map(PlanDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PlanList {
            total: listing.total,
            result,
        })
    }

    async fn activate_or_deactivate_plan(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<PlanDto, Error> {
        let id = FieldErrors::require("id", EntityId::new(id))?;
        let mut plan = self.require_plan(id).await?;
        if plan.is_active() == is_active {
            return PlanDto::try_from(&plan);
        }
        plan.set_active(is_active);
        let updated = self
            .repo
            .update_plan(&plan)
            .await
            .map_err(Self::map_repository_error)?;
        info!(plan_id = id.value(), is_active, "subscription plan status changed");
        PlanDto::try_from(&updated)
    }

    async fn delete_plan(&self, id: i64) -> Result<(), Error> {
        let plan_id = FieldErrors::require("id", EntityId::new(id))?;
        self.get_plan(id).await?;
        self.repo
            .delete_plan(plan_id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(plan_id = plan_id.value(), "subscription plan deleted");
        Ok(())
    }

    async fn subscribe_user_to_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<SubscribeUserResponse, Error> {
        let mut errors = FieldErrors::new();
        let plan_id = errors.check("planId", EntityId::new(plan_id));
        let user_id = errors.check("userId", EntityId::new(user_id));
        let (Some(plan_id), Some(user_id)) = (plan_id, user_id) else {
            return Err(errors.into());
        };

        let plan = self.require_plan(plan_id).await?;
        if !plan.is_active() {
            return Err(Error::conflict(
                "cannot create a subscription for an inactive plan",
            ));
        }

        let now = self.clock.utc();
        let created = self
            .repo
            .create_subscription(&NewSubscription {
                plan_id,
                user_id,
                expires_at: now + plan.duration().as_time_delta(),
            })
            .await
            .map_err(Self::map_repository_error)?;

        let amount = plan
            .price()
            .convert(self.payments.settlement_currency())
            .map_err(|err| Error::internal(err.to_string()))?;
        let mut transaction = Transaction::pending(
            self.payments.provider(),
            amount,
            TransactionEntity::subscription(created.subscription.id),
            now,
        );
        for (key, value) in [
            ("planId", plan_id.to_string()),
            ("userId", user_id.to_string()),
        ] {
            transaction
                .meta_mut()
                .add(key, value)
                .map_err(|err| Error::internal(err.to_string()))?;
        }
        let transaction = self
            .payments
            .initiate_payment(transaction)
            .await
            .map_err(Self::map_payment_error)?;

        info!(
            plan_id = plan_id.value(),
            user_id = user_id.value(),
            subscription_id = created.subscription.id.value(),
            "subscription payment initiated"
        );
        Ok(SubscribeUserResponse {
            id: created.subscriber.id.value(),
            name: created.subscriber.name.to_string(),
            email: created.subscriber.email.to_string(),
            plan: PlanDto::try_from(&plan)?,
            transaction: TransactionDto::try_from(&transaction)?,
        })
    }

    async fn complete_subscription_payment(
        &self,
        transaction_id: i64,
    ) -> Result<SubscriptionDto, Error> {
        let transaction_id = FieldErrors::require("transactionId", EntityId::new(transaction_id))?;
        let transaction = self
            .payments
            .mark_transaction_as_paid(transaction_id)
            .await
            .map_err(Self::map_payment_error)?;
        let entity = transaction.entity();
        if entity.kind != TransactionEntityKind::Subscription {
            return Err(Error::invalid_request(
                "transaction does not pay for a subscription",
            ));
        }
        let record = PaymentRecord {
            paid_at: transaction.paid_at().unwrap_or_else(|| self.clock.utc()),
            transaction_id: transaction_id.to_string(),
            provider: transaction.provider(),
        };
        let subscription = self
            .repo
            .record_subscription_payment(entity.id, &record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            transaction_id = transaction_id.value(),
            subscription_id = subscription.id.value(),
            "subscription payment completed"
        );
        Ok(SubscriptionDto::from(&subscription))
    }

    async fn get_subscribers_list(&self, query: SubscriberQuery) -> Result<SubscriberList, Error> {
        let filter = Self::subscriber_filter(query)?;
        let listing = self
            .repo
            .list_subscribers(&filter)
            .await
            .map_err(Self::map_repository_error)?;
        let now = self.clock.utc();
        Ok(SubscriberList {
            total: listing.total,
            subscribers: listing
                .items
                .iter()
                .map(|subscriber| SubscriberDto::at(subscriber, now))
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
