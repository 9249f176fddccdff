//! Accumulating field validation.
//!
//! Multi-field constructors collect every failure into [`FieldErrors`] so the
//! caller can report all violations at once instead of stopping at the first.

use std::fmt;

use serde::Serialize;
use serde_json::json;

use super::Error;

/// A single named field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as exposed to API clients.
    pub field: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Ordered collection of field failures.
///
/// # Examples
/// ```
/// use assessmate::domain::{FieldErrors, Name};
///
/// let mut errors = FieldErrors::new();
/// let name = errors.check("name", Name::new("  "));
/// assert!(name.is_none());
/// assert_eq!(errors.to_string(), "validation failed: name: name cannot be empty");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Start an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure against `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Unwrap a validation result, recording the error under `field`.
    pub fn check<T, E>(&mut self, field: &str, result: Result<T, E>) -> Option<T>
    where
        E: fmt::Display,
    {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    /// Validate a lone field, converting a failure straight into an [`Error`].
    pub fn require<T, E>(field: &str, result: Result<T, E>) -> Result<T, Error>
    where
        E: fmt::Display,
    {
        result.map_err(|err| {
            let mut errors = Self::new();
            errors.push(field, err.to_string());
            Error::from(errors)
        })
    }

    /// Append every failure from `other`, prefixing field names with `prefix`.
    pub fn merge_nested(&mut self, prefix: &str, other: FieldErrors) {
        for FieldError { field, message } in other.0 {
            self.push(format!("{prefix}.{field}"), message);
        }
    }

    /// Whether no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate recorded failures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether a failure was recorded for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed: ")?;
        for (index, FieldError { field, message }) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::invalid_request(errors.to_string()).with_details(json!({
            "code": "validation_failed",
            "fields": errors.0,
        }))
    }
}
