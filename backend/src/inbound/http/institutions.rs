//! Institution, staff, and group handlers.
//!
//! ```text
//! POST /api/v1/institutions
//! POST /api/v1/institutions/{id}/staff {"name":"Tunde Bello","email":"tunde@school.ng"}
//! POST /api/v1/institutions/{id}/groups/{groupId}/staff {"staffId":3}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{
    AddStaffRequest, AddStaffToGroupRequest, CreateGroupRequest, CreateInstitutionRequest,
    GroupDto, GroupList, InstitutionDto, StaffDto, StaffList,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffBody {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupBody {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberBody {
    pub staff_id: i64,
}

#[utoipa::path(
    post,
    path = "/api/v1/institutions",
    request_body = CreateInstitutionRequest,
    responses(
        (status = 201, description = "Institution created", body = Envelope<InstitutionDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "createInstitution"
)]
#[post("/institutions")]
pub async fn create_institution(
    state: web::Data<HttpState>,
    payload: web::Json<CreateInstitutionRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    state.validator.check(&request)?;
    let institution = state.institutions.create_institution(request).await?;
    info!(institution_id = institution.id, "institution created");
    Ok(Envelope::new("institution created successfully", institution).created())
}

#[utoipa::path(
    get,
    path = "/api/v1/institutions/{id}",
    params(("id" = i64, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Institution", body = Envelope<InstitutionDto>),
        (status = 404, description = "Institution not found", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "getInstitution"
)]
#[get("/institutions/{id}")]
pub async fn get_institution(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let institution = state
        .institutions
        .get_institution_by_id(path.into_inner())
        .await?;
    Ok(Envelope::new("institution fetched successfully", institution).ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/institutions/{id}/staff",
    params(("id" = i64, Path, description = "Institution identifier")),
    request_body = StaffBody,
    responses(
        (status = 201, description = "Staff member added", body = Envelope<StaffDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Institution not found", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "addStaff"
)]
#[post("/institutions/{id}/staff")]
pub async fn add_staff(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<StaffBody>,
) -> ApiResult<HttpResponse> {
    let StaffBody { name, email } = payload.into_inner();
    let request = AddStaffRequest {
        institution_id: path.into_inner(),
        name,
        email,
    };
    state.validator.check(&request)?;
    let staff = state.institutions.add_staff(request).await?;
    Ok(Envelope::new("staff member added successfully", staff).created())
}

#[utoipa::path(
    get,
    path = "/api/v1/institutions/{id}/staff",
    params(("id" = i64, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Staff", body = Envelope<StaffList>),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "listStaff"
)]
#[get("/institutions/{id}/staff")]
pub async fn list_staff(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let staff = state.institutions.get_staff(path.into_inner()).await?;
    Ok(Envelope::new("staff fetched successfully", staff).ok())
}

#[utoipa::path(
    get,
    path = "/api/v1/institutions/{id}/groups",
    params(("id" = i64, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Groups", body = Envelope<GroupList>),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "listGroups"
)]
#[get("/institutions/{id}/groups")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let groups = state.institutions.get_groups(path.into_inner()).await?;
    Ok(Envelope::new("groups fetched successfully", groups).ok())
}

#[utoipa::path(
    post,
    path = "/api/v1/institutions/{id}/groups",
    params(("id" = i64, Path, description = "Institution identifier")),
    request_body = GroupBody,
    responses(
        (status = 201, description = "Group created", body = Envelope<GroupDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Institution not found", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "createGroup"
)]
#[post("/institutions/{id}/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<GroupBody>,
) -> ApiResult<HttpResponse> {
    let GroupBody { name, description } = payload.into_inner();
    let request = CreateGroupRequest {
        institution_id: path.into_inner(),
        name,
        description,
    };
    state.validator.check(&request)?;
    let group = state.institutions.create_group(request).await?;
    Ok(Envelope::new("group created successfully", group).created())
}

/// Add an existing staff member to a group. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/v1/institutions/{id}/groups/{groupId}/staff",
    params(
        ("id" = i64, Path, description = "Institution identifier"),
        ("groupId" = i64, Path, description = "Group identifier")
    ),
    request_body = GroupMemberBody,
    responses(
        (status = 200, description = "Updated group", body = Envelope<GroupDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Group or staff member not found", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "addStaffToGroup"
)]
#[post("/institutions/{id}/groups/{group_id}/staff")]
pub async fn add_staff_to_group(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
    payload: web::Json<GroupMemberBody>,
) -> ApiResult<HttpResponse> {
    let (institution_id, group_id) = path.into_inner();
    let group = state
        .institutions
        .add_staff_to_group(AddStaffToGroupRequest {
            institution_id,
            group_id,
            staff_id: payload.staff_id,
        })
        .await?;
    Ok(Envelope::new("staff member added to group", group).ok())
}

#[cfg(test)]
#[path = "institutions_tests.rs"]
mod tests;
