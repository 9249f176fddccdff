//! Courses that groups can be granted access to.

use chrono::{DateTime, Utc};

use crate::domain::{Description, EntityId, Name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: Option<EntityId>,
    name: Name,
    description: Description,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Course {
    #[must_use]
    pub fn new(name: Name, description: Description, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    pub fn rename(&mut self, name: Name, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &Description {
        &self.description
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
