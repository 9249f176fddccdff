//! Institution staff members.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Email, EntityId, Name};

/// Staff membership status. New staff start inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    Active,
    #[default]
    Inactive,
}

impl StaffStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStaffStatus(pub String);

impl fmt::Display for UnknownStaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown staff status: {}", self.0)
    }
}

impl std::error::Error for UnknownStaffStatus {}

impl FromStr for StaffStatus {
    type Err = UnknownStaffStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownStaffStatus(other.to_owned())),
        }
    }
}

/// A member of an institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    id: Option<EntityId>,
    name: Name,
    email: Email,
    status: StaffStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Staff {
    #[must_use]
    pub fn new(name: Name, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            email,
            status: StaffStatus::default(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    pub fn set_status(&mut self, status: StaffStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Soft delete.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
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
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn status(&self) -> StaffStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
