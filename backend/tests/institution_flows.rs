//! End-to-end institution, staff, and group flows.

#[allow(dead_code, reason = "not every suite uses every helper")]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use actix_web::web;
use assessmate::inbound::http::state::HttpState;
use serde_json::json;
use support::{call, harness, long_description};

async fn create_institution(state: &web::Data<HttpState>, email: &str) -> i64 {
    let (status, body) = call(
        state,
        TestRequest::post().uri("/api/v1/institutions").set_json(json!({
            "name": "Hillside Academy",
            "email": email,
            "description": long_description(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().expect("institution id")
}

async fn add_staff(state: &web::Data<HttpState>, institution: i64, email: &str) -> i64 {
    let (status, body) = call(
        state,
        TestRequest::post()
            .uri(&format!("/api/v1/institutions/{institution}/staff"))
            .set_json(json!({ "name": "Rosalind Franklin", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().expect("staff id")
}

async fn create_group(state: &web::Data<HttpState>, institution: i64) -> i64 {
    let (status, body) = call(
        state,
        TestRequest::post()
            .uri(&format!("/api/v1/institutions/{institution}/groups"))
            .set_json(json!({ "name": "Year Nine", "description": long_description() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().expect("group id")
}

#[actix_web::test]
async fn staff_join_groups_once() {
    let harness = harness();
    let state = harness.state.clone();
    let institution = create_institution(&state, "office@hillside.edu").await;
    let staff = add_staff(&state, institution, "rosalind@hillside.edu").await;
    let group = create_group(&state, institution).await;

    for _ in 0..2 {
        let (status, body) = call(
            &state,
            TestRequest::post()
                .uri(&format!(
                    "/api/v1/institutions/{institution}/groups/{group}/staff"
                ))
                .set_json(json!({ "staffId": staff })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["staffIds"], json!([staff]));
    }

    let (_, body) = call(
        &state,
        TestRequest::get().uri(&format!("/api/v1/institutions/{institution}/staff")),
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["staff"][0]["email"], "rosalind@hillside.edu");

    let (_, body) = call(
        &state,
        TestRequest::get().uri(&format!("/api/v1/institutions/{institution}/groups")),
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
}

#[actix_web::test]
async fn staff_from_another_institution_cannot_join() {
    let harness = harness();
    let state = harness.state.clone();
    let first = create_institution(&state, "office@first.edu").await;
    let second = create_institution(&state, "office@second.edu").await;
    let outsider = add_staff(&state, second, "outsider@second.edu").await;
    let group = create_group(&state, first).await;

    let (status, body) = call(
        &state,
        TestRequest::post()
            .uri(&format!("/api/v1/institutions/{first}/groups/{group}/staff"))
            .set_json(json!({ "staffId": outsider })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn unknown_institution_is_not_found() {
    let harness = harness();

    let (status, _) = call(
        &harness.state,
        TestRequest::get().uri("/api/v1/institutions/42"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &harness.state,
        TestRequest::post()
            .uri("/api/v1/institutions/42/staff")
            .set_json(json!({ "name": "Nobody Here", "email": "nobody@nowhere.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_numeric_path_is_invalid_request() {
    let harness = harness();

    let (status, body) = call(
        &harness.state,
        TestRequest::get().uri("/api/v1/institutions/abc"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
