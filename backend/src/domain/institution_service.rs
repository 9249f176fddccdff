//! Institution domain service.
//!
//! Implements [`InstitutionManagement`] over the institution repository port.
//! Identifier and text inputs are validated together so callers receive every
//! field failure in one response.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AddStaffRequest, AddStaffToGroupRequest, CreateGroupRequest, CreateInstitutionRequest,
    GroupDto, GroupList, InstitutionDto, InstitutionManagement, InstitutionPersistenceError,
    InstitutionRepository, StaffDto, StaffList,
};
use crate::domain::{
    Description, Email, EntityId, Error, FieldErrors, Group, Institution, Name, Staff,
};

/// Institution service implementing the driving port.
#[derive(Clone)]
pub struct InstitutionManagementService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> InstitutionManagementService<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> InstitutionManagementService<R>
where
    R: InstitutionRepository,
{
    fn map_repository_error(error: InstitutionPersistenceError) -> Error {
        match error {
            InstitutionPersistenceError::Connection { message } => Error::service_unavailable(
                format!("institution repository unavailable: {message}"),
            ),
            InstitutionPersistenceError::Query { message } => {
                Error::internal(format!("institution repository error: {message}"))
            }
            InstitutionPersistenceError::InstitutionNotFound { .. } => {
                Error::not_found("institution not found")
            }
            InstitutionPersistenceError::GroupNotFound { .. } => Error::not_found("group not found"),
            InstitutionPersistenceError::StaffNotFound { .. } => {
                Error::not_found("staff member not found")
            }
        }
    }

    async fn require_institution(&self, id: EntityId) -> Result<Institution, Error> {
        self.repo
            .find_institution_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("institution not found"))
    }
}

#[async_trait]
impl<R> InstitutionManagement for InstitutionManagementService<R>
where
    R: InstitutionRepository,
{
    async fn create_institution(
        &self,
        request: CreateInstitutionRequest,
    ) -> Result<InstitutionDto, Error> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", Name::new(&request.name));
        let description = errors.check("description", Description::new(&request.description));
        let email = errors.check("email", Email::new(&request.email));
        let (Some(name), Some(description), Some(email)) = (name, description, email) else {
            return Err(errors.into());
        };

        let institution = Institution::new(name, description, email, self.clock.utc());
        let created = self
            .repo
            .create_institution(&institution)
            .await
            .map_err(Self::map_repository_error)?;
        let dto = InstitutionDto::try_from(&created)?;
        info!(institution_id = dto.id, "institution created");
        Ok(dto)
    }

    async fn get_institution_by_id(&self, id: i64) -> Result<InstitutionDto, Error> {
        let id = FieldErrors::require("id", EntityId::new(id))?;
        let institution = self.require_institution(id).await?;
        InstitutionDto::try_from(&institution)
    }

    async fn add_staff(&self, request: AddStaffRequest) -> Result<StaffDto, Error> {
        let mut errors = FieldErrors::new();
        let institution_id = errors.check("institutionId", EntityId::new(request.institution_id));
        let name = errors.check("name", Name::new(&request.name));
        let email = errors.check("email", Email::new(&request.email));
        let (Some(institution_id), Some(name), Some(email)) = (institution_id, name, email) else {
            return Err(errors.into());
        };

        self.require_institution(institution_id).await?;
        let staff = Staff::new(name, email, self.clock.utc());
        let created = self
            .repo
            .add_staff(institution_id, &staff)
            .await
            .map_err(Self::map_repository_error)?;
        let dto = StaffDto::try_from(&created)?;
        info!(
            institution_id = institution_id.value(),
            staff_id = dto.id,
            "staff member added"
        );
        Ok(dto)
    }

    async fn get_staff(&self, institution_id: i64) -> Result<StaffList, Error> {
        let institution_id = FieldErrors::require("institutionId", EntityId::new(institution_id))?;
        let listing = self
            .repo
            .list_staff(institution_id)
            .await
            .map_err(Self::map_repository_error)?;
        let staff = listing
            .items
            .iter()
            .map(StaffDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StaffList {
            total: listing.total,
            staff,
        })
    }

    async fn get_groups(&self, institution_id: i64) -> Result<GroupList, Error> {
        let institution_id = FieldErrors::require("institutionId", EntityId::new(institution_id))?;
        let listing = self
            .repo
            .list_groups(institution_id)
            .await
            .map_err(Self::map_repository_error)?;
        let groups = listing
            .items
            .iter()
            .map(GroupDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GroupList {
            total: listing.total,
            groups,
        })
    }

    async fn create_group(&self, request: CreateGroupRequest) -> Result<GroupDto, Error> {
        let mut errors = FieldErrors::new();
        let institution_id = errors.check("institutionId", EntityId::new(request.institution_id));
        let name = errors.check("name", Name::new(&request.name));
        let description = errors.check("description", Description::new(&request.description));
        let (Some(institution_id), Some(name), Some(description)) =
            (institution_id, name, description)
        else {
            return Err(errors.into());
        };

        let group = Group::new(name, description, self.clock.utc());
        let created = self
            .repo
            .create_group(institution_id, &group)
            .await
            .map_err(Self::map_repository_error)?;
        let dto = GroupDto::try_from(&created)?;
        info!(
            institution_id = institution_id.value(),
            group_id = dto.id,
            "group created"
        );
        Ok(dto)
    }

    async fn add_staff_to_group(
        &self,
        request: AddStaffToGroupRequest,
    ) -> Result<GroupDto, Error> {
        let mut errors = FieldErrors::new();
        let institution_id = errors.check("institutionId", EntityId::new(request.institution_id));
        let group_id = errors.check("groupId", EntityId::new(request.group_id));
        let staff_id = errors.check("staffId", EntityId::new(request.staff_id));
        let (Some(institution_id), Some(group_id), Some(staff_id)) =
            (institution_id, group_id, staff_id)
        else {
            return Err(errors.into());
        };

        self.repo
            .find_staff(institution_id, staff_id)
            .await
            .map_err(Self::map_repository_error)?
            .filter(|staff| !staff.is_deleted())
            .ok_or_else(|| Error::not_found("staff member not found in institution"))?;
        let group = self
            .repo
            .find_group(institution_id, group_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("group not found"))?;
        if group.has_staff(staff_id) {
            return GroupDto::try_from(&group);
        }

        let updated = self
            .repo
            .add_staff_to_group(institution_id, group_id, staff_id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            group_id = group_id.value(),
            staff_id = staff_id.value(),
            "staff member added to group"
        );
        GroupDto::try_from(&updated)
    }
}

#[cfg(test)]
#[path = "institution_service_tests.rs"]
mod tests;
