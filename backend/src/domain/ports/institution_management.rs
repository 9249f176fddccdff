//! Driving port for institution, staff, and group operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Group, Institution, Staff, StaffStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitutionRequest {
    pub name: String,
    pub email: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffRequest {
    pub institution_id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub institution_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffToGroupRequest {
    pub institution_id: i64,
    pub group_id: i64,
    pub staff_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Institution> for InstitutionDto {
    type Error = Error;

    fn try_from(value: &Institution) -> Result<Self, Self::Error> {
        let id = value
            .id()
            .ok_or_else(|| Error::internal("institution is missing an id"))?;
        Ok(Self {
            id: id.value(),
            name: value.name().to_string(),
            description: value.description().to_string(),
            email: value.email().to_string(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Staff> for StaffDto {
    type Error = Error;

    fn try_from(value: &Staff) -> Result<Self, Self::Error> {
        let id = value
            .id()
            .ok_or_else(|| Error::internal("staff member is missing an id"))?;
        Ok(Self {
            id: id.value(),
            name: value.name().to_string(),
            email: value.email().to_string(),
            status: value.status(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub staff_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Group> for GroupDto {
    type Error = Error;

    fn try_from(value: &Group) -> Result<Self, Self::Error> {
        let id = value
            .id()
            .ok_or_else(|| Error::internal("group is missing an id"))?;
        Ok(Self {
            id: id.value(),
            name: value.name().to_string(),
            description: value.description().to_string(),
            staff_ids: value.staff_ids().iter().map(|id| id.value()).collect(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffList {
    pub total: usize,
    pub staff: Vec<StaffDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupList {
    pub total: usize,
    pub groups: Vec<GroupDto>,
}

/// Domain use-case port for institutions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstitutionManagement: Send + Sync {
    async fn create_institution(
        &self,
        request: CreateInstitutionRequest,
    ) -> Result<InstitutionDto, Error>;

    async fn get_institution_by_id(&self, id: i64) -> Result<InstitutionDto, Error>;

    /// Add a staff member to an existing institution.
    async fn add_staff(&self, request: AddStaffRequest) -> Result<StaffDto, Error>;

    async fn get_staff(&self, institution_id: i64) -> Result<StaffList, Error>;

    async fn get_groups(&self, institution_id: i64) -> Result<GroupList, Error>;

    async fn create_group(&self, request: CreateGroupRequest) -> Result<GroupDto, Error>;

    /// Add an institution's staff member to one of its groups.
    async fn add_staff_to_group(&self, request: AddStaffToGroupRequest)
    -> Result<GroupDto, Error>;
}
