//! Rendering of domain failures as HTTP responses.
//!
//! Handlers return [`ApiResult`]; actix calls [`ResponseError`] on the error
//! branch. Extractor rejections are funnelled through the same JSON body via
//! the `*_error_handler` functions registered on the extractor configs.

use std::fmt::Display;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const INTERNAL_MESSAGE: &str = "Internal server error";

pub type ApiResult<T> = Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code().as_str(), message = %self.message(), "request failed");
        }

        let mut response = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(public_view(self))
    }
}

/// Body sent to clients: internal failures lose their message and details.
fn public_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let masked = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => masked.with_trace_id(id),
        None => masked,
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "unexpected actix error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

fn rejected(source: &str, err: impl Display) -> actix_web::Error {
    debug!(%err, source, "extractor rejected request");
    Error::invalid_request(format!("invalid {source}: {err}")).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("JSON payload", err)
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("query string", err)
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected("path parameter", err)
}
