//! Tests for the institution aggregate.

use super::*;
use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn description() -> Description {
    Description::new("d".repeat(160)).expect("valid description")
}

fn id(value: i64) -> EntityId {
    EntityId::new(value).expect("valid id")
}

#[rstest]
fn staff_default_to_inactive(now: DateTime<Utc>) {
    let staff = Staff::new(
        Name::new("Kemi Ade").expect("valid name"),
        Email::new("kemi@school.edu").expect("valid email"),
        now,
    );
    assert_eq!(staff.status(), StaffStatus::Inactive);
    assert!(!staff.is_deleted());
}

#[rstest]
fn soft_deleting_staff_records_timestamp(now: DateTime<Utc>) {
    let mut staff = Staff::new(
        Name::new("Kemi Ade").expect("valid name"),
        Email::new("kemi@school.edu").expect("valid email"),
        now,
    );
    let later = now + Duration::days(1);
    staff.mark_deleted(later);
    assert!(staff.is_deleted());
    assert_eq!(staff.deleted_at(), Some(later));
    assert_eq!(staff.updated_at(), later);
}

#[rstest]
fn groups_ignore_duplicate_staff(now: DateTime<Utc>) {
    let mut group = Group::new(Name::new("Science").expect("valid name"), description(), now);
    assert!(group.add_staff(id(3), now));
    assert!(!group.add_staff(id(3), now + Duration::minutes(1)));
    assert_eq!(group.staff_ids(), &[id(3)]);
    assert_eq!(group.updated_at(), now);
}

#[rstest]
fn groups_collect_courses(now: DateTime<Utc>) {
    let mut group = Group::new(Name::new("Science").expect("valid name"), description(), now);
    let course = Course::new(Name::new("Physics").expect("valid name"), description(), now);
    let later = now + Duration::hours(2);
    group.add_course(course.clone(), later);
    assert_eq!(group.accessible_courses(), &[course]);
    assert_eq!(group.updated_at(), later);
}

#[rstest]
fn institution_mutations_touch(now: DateTime<Utc>) {
    let mut institution = Institution::new(
        Name::new("Kings College").expect("valid name"),
        description(),
        Email::new("admin@kings.edu").expect("valid email"),
        now,
    );
    let later = now + Duration::days(2);
    institution.rename(Name::new("Kings Academy").expect("valid name"), later);
    assert_eq!(institution.name().as_ref(), "Kings Academy");
    assert_eq!(institution.updated_at(), later);
    assert_eq!(institution.created_at(), now);
}
