//! Transport-agnostic failure type returned by every service operation.
//!
//! Adapters decide how a failure is rendered; the domain only classifies it
//! with an [`ErrorCode`] and attaches a message plus optional JSON details.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Failure category, serialised in snake case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed shape or value-object validation.
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Inactive plan, duplicate email, or a similar state clash.
    Conflict,
    /// A port reported a connection-level failure.
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    /// Wire name of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

/// Service failure with a code, message, and correlation data.
///
/// Construction records [`TraceId::current`], so an error raised while a
/// request is in flight already names that request.
///
/// # Examples
/// ```
/// use assessmate::domain::{Error, ErrorCode};
///
/// let err = Error::conflict("cannot create a subscription for an inactive plan");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.to_string(), "conflict: cannot create a subscription for an inactive plan");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

macro_rules! error_constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Build an [`ErrorCode::", stringify!($code), "`] error.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    error_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured payload such as the per-field list of a validation failure.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Override the captured correlation identifier.
    #[must_use]
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(id.into()),
            ..self
        }
    }

    /// Attach structured details.
    ///
    /// ```
    /// use assessmate::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    /// assert_eq!(err.details(), Some(&json!({ "field": "name" })));
    /// ```
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    #[must_use]
    pub fn without_details(self) -> Self {
        Self {
            details: None,
            ..self
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}
