//! Request shape validation for inbound HTTP adapters.
//!
//! [`PayloadValidator`] is constructed explicitly and carried in
//! [`HttpState`](super::state::HttpState). It checks the shape of incoming
//! payloads (required fields, length bounds) and reports every failure at
//! once. Semantic validation (email format, value-object bounds) stays in the
//! domain services.

use crate::domain::ports::{
    AddStaffRequest, CreateGroupRequest, CreateInstitutionRequest, CreatePlanRequest,
    LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyUserRequest,
};
use crate::domain::{Error, FieldErrors};

/// Length limits enforced on request payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimits {
    pub email_max: usize,
    pub name_max: usize,
    pub password_min: usize,
    pub password_max: usize,
    pub token_min: usize,
    pub token_max: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            email_max: 255,
            name_max: 100,
            password_min: 5,
            password_max: 17,
            token_min: 5,
            token_max: 200,
        }
    }
}

/// Validates inbound payloads against [`PayloadLimits`].
///
/// # Examples
/// ```
/// use assessmate::domain::ports::LoginRequest;
/// use assessmate::inbound::http::validation::PayloadValidator;
///
/// let validator = PayloadValidator::default();
/// let request = LoginRequest {
///     email: "ada@example.com".to_owned(),
///     password: "abc".to_owned(),
/// };
/// assert!(validator.check(&request).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadValidator {
    limits: PayloadLimits,
}

impl PayloadValidator {
    #[must_use]
    pub fn new(limits: PayloadLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> PayloadLimits {
        self.limits
    }

    /// Validate `payload`, returning an `invalid_request` listing every failure.
    pub fn check<P: ValidatePayload>(&self, payload: &P) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        payload.validate(self, &mut errors);
        errors.into_result().map_err(Error::from)
    }

    fn required(&self, errors: &mut FieldErrors, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            errors.push(field, format!("{field} is required"));
            return false;
        }
        true
    }

    fn bounded(&self, errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize) {
        if !self.required(errors, field, value) {
            return;
        }
        let length = value.chars().count();
        if length < min {
            errors.push(field, format!("{field} must be at least {min} characters long"));
        } else if length > max {
            errors.push(field, format!("{field} must not exceed {max} characters"));
        }
    }

    fn email(&self, errors: &mut FieldErrors, value: &str) {
        self.bounded(errors, "email", value, 1, self.limits.email_max);
    }

    fn name(&self, errors: &mut FieldErrors, value: &str) {
        self.bounded(errors, "name", value, 1, self.limits.name_max);
    }

    fn password(&self, errors: &mut FieldErrors, value: &str) {
        self.bounded(
            errors,
            "password",
            value,
            self.limits.password_min,
            self.limits.password_max,
        );
    }

    fn token(&self, errors: &mut FieldErrors, value: &str) {
        self.bounded(
            errors,
            "token",
            value,
            self.limits.token_min,
            self.limits.token_max,
        );
    }

    /// Validate a payload carrying only an email address.
    pub fn check_email(&self, email: &str) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        self.email(&mut errors, email);
        errors.into_result().map_err(Error::from)
    }
}

/// Payloads that can be checked by [`PayloadValidator`].
pub trait ValidatePayload {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors);
}

impl ValidatePayload for RegisterRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.name(errors, &self.name);
        validator.email(errors, &self.email);
        validator.password(errors, &self.password);
    }
}

impl ValidatePayload for LoginRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.email(errors, &self.email);
        validator.password(errors, &self.password);
    }
}

impl ValidatePayload for VerifyUserRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.email(errors, &self.email);
        validator.token(errors, &self.token);
    }
}

impl ValidatePayload for ResetPasswordRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.email(errors, &self.email);
        validator.token(errors, &self.token);
        validator.password(errors, &self.password);
    }
}

impl ValidatePayload for CreatePlanRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.name(errors, &self.name);
        validator.required(errors, "description", &self.description);
        validator.required(errors, "subscriptionType", &self.subscription_type);
    }
}

impl ValidatePayload for CreateInstitutionRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.name(errors, &self.name);
        validator.email(errors, &self.email);
        validator.required(errors, "description", &self.description);
    }
}

impl ValidatePayload for AddStaffRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.name(errors, &self.name);
        validator.email(errors, &self.email);
    }
}

impl ValidatePayload for CreateGroupRequest {
    fn validate(&self, validator: &PayloadValidator, errors: &mut FieldErrors) {
        validator.name(errors, &self.name);
        validator.required(errors, "description", &self.description);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for payload shape checks.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        let validator = PayloadValidator::default();
        assert!(
            validator
                .check(&register("Ada Obi", "ada@example.com", "hunter22"))
                .is_ok()
        );
    }

    #[rstest]
    #[case("abcd", "password must be at least 5 characters long")]
    #[case("abcdefghijklmnopqr", "password must not exceed 17 characters")]
    #[case("   ", "password is required")]
    fn password_bounds_are_enforced(#[case] password: &str, #[case] message: &str) {
        let error = PayloadValidator::default()
            .check(&register("Ada Obi", "ada@example.com", password))
            .expect_err("invalid password");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), format!("validation failed: password: {message}"));
    }

    #[test]
    fn password_bounds_are_inclusive() {
        let validator = PayloadValidator::default();
        assert!(validator.check(&register("Ada", "a@b.co", "abcde")).is_ok());
        assert!(
            validator
                .check(&register("Ada", "a@b.co", "abcdefghijklmnopq"))
                .is_ok()
        );
    }

    #[test]
    fn reports_every_missing_field() {
        let error = PayloadValidator::default()
            .check(&register("", "", ""))
            .expect_err("empty payload");
        let fields = &error.details().expect("details")["fields"];
        assert_eq!(fields.as_array().map(Vec::len), Some(3));
        assert_eq!(fields[0]["field"], "name");
        assert_eq!(fields[1]["field"], "email");
        assert_eq!(fields[2]["field"], "password");
    }

    #[test]
    fn custom_limits_are_respected() {
        let validator = PayloadValidator::new(PayloadLimits {
            password_min: 8,
            ..PayloadLimits::default()
        });
        assert!(
            validator
                .check(&LoginRequest {
                    email: "ada@example.com".to_owned(),
                    password: "short".to_owned(),
                })
                .is_err()
        );
        assert_eq!(validator.limits().password_min, 8);
    }

    #[test]
    fn check_email_rejects_overlong_addresses() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(PayloadValidator::default().check_email(&long).is_err());
        assert!(PayloadValidator::default().check_email("ada@example.com").is_ok());
    }

    #[test]
    fn verification_token_must_fit_bounds() {
        let error = PayloadValidator::default()
            .check(&VerifyUserRequest {
                email: "ada@example.com".to_owned(),
                token: "abc".to_owned(),
            })
            .expect_err("short token");
        assert_eq!(
            error.message(),
            "validation failed: token: token must be at least 5 characters long"
        );
    }

    #[test]
    fn group_requires_description() {
        let error = PayloadValidator::default()
            .check(&CreateGroupRequest {
                institution_id: 1,
                name: "Science".to_owned(),
                description: " ".to_owned(),
            })
            .expect_err("missing description");
        assert_eq!(
            error.message(),
            "validation failed: description: description is required"
        );
    }
}
