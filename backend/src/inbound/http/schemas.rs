//! utoipa mirrors of the domain error payload.
//!
//! `crate::domain::Error` has private fields and no utoipa derive; these
//! stand-ins describe the same JSON so the generated document can reference
//! it by the domain type's name.

use serde_json::Value;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCodeSchema {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServiceUnavailable,
    InternalError,
}

/// Body of every non-2xx response.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "fields are read by the schema derive only")]
pub struct ErrorSchema {
    code: ErrorCodeSchema,
    #[schema(example = "subscription plan 7 not found")]
    message: String,
    /// Matches the `trace-id` response header.
    #[schema(example = "4c1f6a0e-33a8-4a4e-9a53-8c1b2a7d9e10")]
    trace_id: Option<String>,
    /// `{"code": "validation_failed", "fields": [...]}` for rejected payloads.
    details: Option<Value>,
}
