//! Staff groups within an institution.

use chrono::{DateTime, Utc};

use super::Course;
use crate::domain::{Description, EntityId, Name};

/// A named subset of an institution's staff with shared course access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: Option<EntityId>,
    name: Name,
    description: Description,
    staff_ids: Vec<EntityId>,
    accessible_courses: Vec<Course>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Group {
    #[must_use]
    pub fn new(name: Name, description: Description, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            description,
            staff_ids: Vec::new(),
            accessible_courses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// Add a staff member. Returns `false` when already a member.
    pub fn add_staff(&mut self, staff_id: EntityId, now: DateTime<Utc>) -> bool {
        if self.staff_ids.contains(&staff_id) {
            return false;
        }
        let mut staff_ids = self.staff_ids.clone();
        staff_ids.push(staff_id);
        self.staff_ids = staff_ids;
        self.updated_at = now;
        true
    }

    /// Grant access to a course.
    pub fn add_course(&mut self, course: Course, now: DateTime<Utc>) {
        let mut courses = self.accessible_courses.clone();
        courses.push(course);
        self.accessible_courses = courses;
        self.updated_at = now;
    }

    #[must_use]
    pub fn has_staff(&self, staff_id: EntityId) -> bool {
        self.staff_ids.contains(&staff_id)
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
    pub fn staff_ids(&self) -> &[EntityId] {
        &self.staff_ids
    }

    #[must_use]
    pub fn accessible_courses(&self) -> &[Course] {
        &self.accessible_courses
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
