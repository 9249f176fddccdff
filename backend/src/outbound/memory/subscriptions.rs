//! [`SubscriptionRepository`] over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{SubscriptionPersistenceError, SubscriptionRepository};
use crate::domain::{
    CreatedSubscription, EntityId, Listing, NewSubscription, PaymentRecord, PlanFilter,
    Subscriber, SubscriberFilter, Subscription, SubscriptionPlan,
};

use super::{InMemoryStore, Tables};

/// Build a subscriber carrying every subscription the user holds.
fn subscriber_for(
    tables: &Tables,
    user_id: EntityId,
) -> Result<Subscriber, SubscriptionPersistenceError> {
    let user = tables
        .users
        .get(&user_id)
        .ok_or_else(|| SubscriptionPersistenceError::user_not_found(user_id.value()))?;
    let subscriptions = tables
        .subscriptions
        .values()
        .filter(|subscription| subscription.user_id == user_id)
        .cloned()
        .collect();
    Ok(Subscriber::new(
        user_id,
        user.name().clone(),
        user.email().clone(),
        subscriptions,
    ))
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, SubscriptionPersistenceError> {
        let mut tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        let id = tables
            .plan_ids
            .next()
            .map_err(|err| SubscriptionPersistenceError::query(err.to_string()))?;
        let mut stored = plan.clone();
        stored.assign_id(id);
        tables.plans.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, SubscriptionPersistenceError> {
        let id = plan.id().ok_or_else(|| {
            SubscriptionPersistenceError::query("cannot update a plan without an id")
        })?;
        let mut tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        let slot = tables
            .plans
            .get_mut(&id)
            .ok_or_else(|| SubscriptionPersistenceError::plan_not_found(id.value()))?;
        *slot = plan.clone();
        Ok(plan.clone())
    }

    async fn find_plan_by_id(
        &self,
        id: EntityId,
    ) -> Result<Option<SubscriptionPlan>, SubscriptionPersistenceError> {
        let tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        Ok(tables.plans.get(&id).cloned())
    }

    async fn list_plans(
        &self,
        filter: PlanFilter,
    ) -> Result<Listing<SubscriptionPlan>, SubscriptionPersistenceError> {
        let tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        let plans = tables
            .plans
            .values()
            .filter(|plan| filter.is_active.is_none_or(|active| plan.is_active() == active))
            .cloned()
            .collect();
        Ok(Listing::complete(plans))
    }

    async fn delete_plan(&self, id: EntityId) -> Result<(), SubscriptionPersistenceError> {
        let mut tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        tables
            .plans
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| SubscriptionPersistenceError::plan_not_found(id.value()))
    }

    async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Listing<Subscriber>, SubscriptionPersistenceError> {
        let tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        let mut user_ids: Vec<EntityId> = tables
            .subscriptions
            .values()
            .filter(|subscription| filter.matches(subscription))
            .map(|subscription| subscription.user_id)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let subscribers = user_ids
            .into_iter()
            .map(|user_id| subscriber_for(&tables, user_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Listing::complete(subscribers))
    }

    async fn create_subscription(
        &self,
        input: &NewSubscription,
    ) -> Result<CreatedSubscription, SubscriptionPersistenceError> {
        let mut tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        if !tables.plans.contains_key(&input.plan_id) {
            return Err(SubscriptionPersistenceError::plan_not_found(
                input.plan_id.value(),
            ));
        }
        if !tables.users.contains_key(&input.user_id) {
            return Err(SubscriptionPersistenceError::user_not_found(
                input.user_id.value(),
            ));
        }
        let id = tables
            .subscription_ids
            .next()
            .map_err(|err| SubscriptionPersistenceError::query(err.to_string()))?;
        let subscription = Subscription::pending(id, input);
        tables.subscriptions.insert(id, subscription.clone());
        let subscriber = subscriber_for(&tables, input.user_id)?;
        Ok(CreatedSubscription {
            subscriber,
            subscription,
        })
    }

    async fn record_subscription_payment(
        &self,
        subscription_id: EntityId,
        record: &PaymentRecord,
    ) -> Result<Subscription, SubscriptionPersistenceError> {
        let mut tables = self
            .lock()
            .map_err(SubscriptionPersistenceError::connection)?;
        let subscription = tables.subscriptions.get_mut(&subscription_id).ok_or_else(|| {
            SubscriptionPersistenceError::subscription_not_found(subscription_id.value())
        })?;
        subscription.record_payment(record.clone());
        Ok(subscription.clone())
    }
}
