//! Port abstraction for institution persistence.
use async_trait::async_trait;

use crate::domain::{EntityId, Group, Institution, Listing, Staff};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by institution repository adapters.
    pub enum InstitutionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "institution repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "institution repository query failed: {message}",
        InstitutionNotFound { id: i64 } => "institution {id} not found",
        GroupNotFound { id: i64 } => "group {id} not found",
        StaffNotFound { id: i64 } => "staff {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstitutionRepository: Send + Sync {
    async fn create_institution(
        &self,
        institution: &Institution,
    ) -> Result<Institution, InstitutionPersistenceError>;

    async fn find_institution_by_id(
        &self,
        id: EntityId,
    ) -> Result<Option<Institution>, InstitutionPersistenceError>;

    /// Attach a new staff member to an institution.
    async fn add_staff(
        &self,
        institution_id: EntityId,
        staff: &Staff,
    ) -> Result<Staff, InstitutionPersistenceError>;

    async fn list_staff(
        &self,
        institution_id: EntityId,
    ) -> Result<Listing<Staff>, InstitutionPersistenceError>;

    async fn find_staff(
        &self,
        institution_id: EntityId,
        staff_id: EntityId,
    ) -> Result<Option<Staff>, InstitutionPersistenceError>;

    async fn create_group(
        &self,
        institution_id: EntityId,
        group: &Group,
    ) -> Result<Group, InstitutionPersistenceError>;

    async fn list_groups(
        &self,
        institution_id: EntityId,
    ) -> Result<Listing<Group>, InstitutionPersistenceError>;

    async fn find_group(
        &self,
        institution_id: EntityId,
        group_id: EntityId,
    ) -> Result<Option<Group>, InstitutionPersistenceError>;

    /// Add a staff member to a group, returning the updated group.
    async fn add_staff_to_group(
        &self,
        institution_id: EntityId,
        group_id: EntityId,
        staff_id: EntityId,
    ) -> Result<Group, InstitutionPersistenceError>;
}
