//! Tests for institution HTTP handlers.

use super::*;
use crate::domain::ports::MockInstitutionManagement;
use crate::domain::{Error, StaffStatus};
use crate::inbound::http::test_utils::TestPorts;
use crate::test_support::{fixture_timestamp, long_description};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use mockall::predicate::eq;
use serde_json::{Value, json};

fn institution_dto(id: i64) -> InstitutionDto {
    InstitutionDto {
        id,
        name: "Kings College".to_owned(),
        description: long_description(),
        email: "admin@kings.edu.ng".to_owned(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

fn staff_dto(id: i64) -> StaffDto {
    StaffDto {
        id,
        name: "Tunde Bello".to_owned(),
        email: "tunde@kings.edu.ng".to_owned(),
        status: StaffStatus::Active,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

fn group_dto(id: i64, staff_ids: Vec<i64>) -> GroupDto {
    GroupDto {
        id,
        name: "Science".to_owned(),
        description: long_description(),
        staff_ids,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

async fn send(
    institutions: MockInstitutionManagement,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let ports = TestPorts {
        institutions,
        ..TestPorts::default()
    };
    let app = actix_test::init_service(
        App::new().app_data(ports.into_state()).service(
            web::scope("/api/v1")
                .service(create_institution)
                .service(get_institution)
                .service(add_staff)
                .service(list_staff)
                .service(list_groups)
                .service(create_group)
                .service(add_staff_to_group),
        ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[actix_web::test]
async fn create_institution_returns_created() {
    let mut institutions = MockInstitutionManagement::new();
    institutions
        .expect_create_institution()
        .withf(|request| request.email == "admin@kings.edu.ng")
        .returning(|_| Ok(institution_dto(1)));

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::post()
            .uri("/api/v1/institutions")
            .set_json(json!({
                "name": "Kings College",
                "email": "admin@kings.edu.ng",
                "description": long_description()
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
}

#[actix_web::test]
async fn create_institution_reports_missing_fields_together() {
    let mut institutions = MockInstitutionManagement::new();
    institutions.expect_create_institution().never();

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::post()
            .uri("/api/v1/institutions")
            .set_json(json!({"name": "", "email": "", "description": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["fields"].as_array().map(Vec::len), Some(3));
}

#[actix_web::test]
async fn get_institution_maps_not_found() {
    let mut institutions = MockInstitutionManagement::new();
    institutions
        .expect_get_institution_by_id()
        .with(eq(8))
        .returning(|_| Err(Error::not_found("institution not found")));

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::get().uri("/api/v1/institutions/8"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "institution not found");
}

#[actix_web::test]
async fn add_staff_takes_institution_from_path() {
    let mut institutions = MockInstitutionManagement::new();
    institutions
        .expect_add_staff()
        .with(eq(AddStaffRequest {
            institution_id: 2,
            name: "Tunde Bello".to_owned(),
            email: "tunde@kings.edu.ng".to_owned(),
        }))
        .returning(|_| Ok(staff_dto(3)));

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::post()
            .uri("/api/v1/institutions/2/staff")
            .set_json(json!({"name": "Tunde Bello", "email": "tunde@kings.edu.ng"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "active");
}

#[actix_web::test]
async fn list_staff_and_groups_use_path_id() {
    let mut institutions = MockInstitutionManagement::new();
    institutions.expect_get_staff().with(eq(2)).returning(|_| {
        Ok(StaffList {
            total: 1,
            staff: vec![staff_dto(3)],
        })
    });

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::get().uri("/api/v1/institutions/2/staff"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["staff"][0]["id"], 3);

    let mut institutions = MockInstitutionManagement::new();
    institutions.expect_get_groups().with(eq(2)).returning(|_| {
        Ok(GroupList {
            total: 1,
            groups: vec![group_dto(5, vec![3])],
        })
    });

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::get().uri("/api/v1/institutions/2/groups"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["groups"][0]["staffIds"], json!([3]));
}

#[actix_web::test]
async fn create_group_builds_request() {
    let mut institutions = MockInstitutionManagement::new();
    institutions
        .expect_create_group()
        .withf(|request| request.institution_id == 2 && request.name == "Science")
        .returning(|_| Ok(group_dto(5, Vec::new())));

    let (status, _) = send(
        institutions,
        actix_test::TestRequest::post()
            .uri("/api/v1/institutions/2/groups")
            .set_json(json!({"name": "Science", "description": long_description()})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn add_staff_to_group_combines_path_and_body() {
    let mut institutions = MockInstitutionManagement::new();
    institutions
        .expect_add_staff_to_group()
        .with(eq(AddStaffToGroupRequest {
            institution_id: 2,
            group_id: 5,
            staff_id: 3,
        }))
        .returning(|_| Ok(group_dto(5, vec![3])));

    let (status, body) = send(
        institutions,
        actix_test::TestRequest::post()
            .uri("/api/v1/institutions/2/groups/5/staff")
            .set_json(json!({"staffId": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["staffIds"], json!([3]));
}
