//! In-process persistence for users, plans, subscriptions, and institutions.
//!
//! [`InMemoryStore`] implements every repository port over a single
//! `std::sync::Mutex`. Each call takes the lock once, so a service composing
//! several calls observes no transactional guarantees, matching what a
//! database-backed adapter would offer without explicit transactions.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use mockable::Clock;

use crate::domain::{
    EntityId, Group, IdValidationError, Institution, Staff, Subscription, SubscriptionPlan, Token,
    User,
};

mod institutions;
mod subscriptions;
mod users;

/// Monotonic id allocator for one table.
#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> Result<EntityId, IdValidationError> {
        self.0 += 1;
        EntityId::new(self.0)
    }
}

#[derive(Debug, Default)]
struct Tables {
    user_ids: Sequence,
    users: BTreeMap<EntityId, User>,
    token_ids: Sequence,
    tokens: BTreeMap<EntityId, Token>,
    plan_ids: Sequence,
    plans: BTreeMap<EntityId, SubscriptionPlan>,
    subscription_ids: Sequence,
    subscriptions: BTreeMap<EntityId, Subscription>,
    institution_ids: Sequence,
    institutions: BTreeMap<EntityId, Institution>,
    staff_ids: Sequence,
    /// Staff keyed by id, tagged with the owning institution.
    staff: BTreeMap<EntityId, (EntityId, Staff)>,
    group_ids: Sequence,
    groups: BTreeMap<EntityId, (EntityId, Group)>,
}

/// Mutex-guarded store implementing the repository ports.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    /// Lock the tables, describing a poisoned lock as a plain message.
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[cfg(test)]
mod tests;
