//! Orchestrator probes.
//!
//! `/health/live` answers as long as the process can serve HTTP at all.
//! `/health/ready` stays at 503 until [`HealthState::mark_ready`] is called
//! after the notification worker has been spawned and the listener bound.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::{CACHE_CONTROL, CacheControl, CacheDirective};
use actix_web::{HttpResponse, get, web};

#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn uncached(mut response: actix_web::HttpResponseBuilder) -> HttpResponse {
    response
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .finish()
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Still starting")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        uncached(HttpResponse::Ok())
    } else {
        uncached(HttpResponse::ServiceUnavailable())
    }
}

#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is serving requests"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncached(HttpResponse::Ok())
}
