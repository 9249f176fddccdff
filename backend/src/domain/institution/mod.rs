//! Institutions, their staff, groups, and courses.

mod course;
mod group;
mod staff;

use chrono::{DateTime, Utc};

pub use course::Course;
pub use group::Group;
pub use staff::{Staff, StaffStatus, UnknownStaffStatus};

use crate::domain::{Description, Email, EntityId, Name};

/// An organisation whose staff share plan limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    id: Option<EntityId>,
    name: Name,
    description: Description,
    email: Email,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Institution {
    #[must_use]
    pub fn new(name: Name, description: Description, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            description,
            email,
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

    pub fn describe(&mut self, description: Description, now: DateTime<Utc>) {
        self.description = description;
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
    pub fn email(&self) -> &Email {
        &self.email
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

#[cfg(test)]
mod tests;
