//! Success response envelope shared by all JSON endpoints.

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ "message": ..., "data": ... }` wrapper for successful responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

/// Placeholder payload for endpoints that only acknowledge an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Empty {}

impl<T: Serialize> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    /// `200 OK` with this envelope as the body.
    pub fn ok(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }

    /// `201 Created` with this envelope as the body.
    pub fn created(self) -> HttpResponse {
        HttpResponse::Created().json(self)
    }
}

impl Envelope<Empty> {
    pub fn acknowledge(message: impl Into<String>) -> Self {
        Self::new(message, Empty {})
    }
}
