//! [`InstitutionRepository`] over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{InstitutionPersistenceError, InstitutionRepository};
use crate::domain::{EntityId, Group, Institution, Listing, Staff};

use super::InMemoryStore;

fn query_error(err: impl ToString) -> InstitutionPersistenceError {
    InstitutionPersistenceError::query(err.to_string())
}

#[async_trait]
impl InstitutionRepository for InMemoryStore {
    async fn create_institution(
        &self,
        institution: &Institution,
    ) -> Result<Institution, InstitutionPersistenceError> {
        let mut tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        let id = tables.institution_ids.next().map_err(query_error)?;
        let mut stored = institution.clone();
        stored.assign_id(id);
        tables.institutions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_institution_by_id(
        &self,
        id: EntityId,
    ) -> Result<Option<Institution>, InstitutionPersistenceError> {
        let tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        Ok(tables.institutions.get(&id).cloned())
    }

    async fn add_staff(
        &self,
        institution_id: EntityId,
        staff: &Staff,
    ) -> Result<Staff, InstitutionPersistenceError> {
        let mut tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        if !tables.institutions.contains_key(&institution_id) {
            return Err(InstitutionPersistenceError::institution_not_found(
                institution_id.value(),
            ));
        }
        let id = tables.staff_ids.next().map_err(query_error)?;
        let mut stored = staff.clone();
        stored.assign_id(id);
        tables.staff.insert(id, (institution_id, stored.clone()));
        Ok(stored)
    }

    async fn list_staff(
        &self,
        institution_id: EntityId,
    ) -> Result<Listing<Staff>, InstitutionPersistenceError> {
        let tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        let staff = tables
            .staff
            .values()
            .filter(|(owner, _)| *owner == institution_id)
            .map(|(_, staff)| staff.clone())
            .collect();
        Ok(Listing::complete(staff))
    }

    async fn find_staff(
        &self,
        institution_id: EntityId,
        staff_id: EntityId,
    ) -> Result<Option<Staff>, InstitutionPersistenceError> {
        let tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        Ok(tables
            .staff
            .get(&staff_id)
            .filter(|(owner, _)| *owner == institution_id)
            .map(|(_, staff)| staff.clone()))
    }

    async fn create_group(
        &self,
        institution_id: EntityId,
        group: &Group,
    ) -> Result<Group, InstitutionPersistenceError> {
        let mut tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        if !tables.institutions.contains_key(&institution_id) {
            return Err(InstitutionPersistenceError::institution_not_found(
                institution_id.value(),
            ));
        }
        let id = tables.group_ids.next().map_err(query_error)?;
        let mut stored = group.clone();
        stored.assign_id(id);
        tables.groups.insert(id, (institution_id, stored.clone()));
        Ok(stored)
    }

    async fn list_groups(
        &self,
        institution_id: EntityId,
    ) -> Result<Listing<Group>, InstitutionPersistenceError> {
        let tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        let groups = tables
            .groups
            .values()
            .filter(|(owner, _)| *owner == institution_id)
            .map(|(_, group)| group.clone())
            .collect();
        Ok(Listing::complete(groups))
    }

    async fn find_group(
        &self,
        institution_id: EntityId,
        group_id: EntityId,
    ) -> Result<Option<Group>, InstitutionPersistenceError> {
        let tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        Ok(tables
            .groups
            .get(&group_id)
            .filter(|(owner, _)| *owner == institution_id)
            .map(|(_, group)| group.clone()))
    }

    async fn add_staff_to_group(
        &self,
        institution_id: EntityId,
        group_id: EntityId,
        staff_id: EntityId,
    ) -> Result<Group, InstitutionPersistenceError> {
        let now = self.clock.utc();
        let mut tables = self.lock().map_err(InstitutionPersistenceError::connection)?;
        let staff_belongs = tables
            .staff
            .get(&staff_id)
            .is_some_and(|(owner, _)| *owner == institution_id);
        if !staff_belongs {
            return Err(InstitutionPersistenceError::staff_not_found(staff_id.value()));
        }
        let group = tables
            .groups
            .get_mut(&group_id)
            .filter(|(owner, _)| *owner == institution_id)
            .map(|(_, group)| group)
            .ok_or_else(|| InstitutionPersistenceError::group_not_found(group_id.value()))?;
        group.add_staff(staff_id, now);
        Ok(group.clone())
    }
}
