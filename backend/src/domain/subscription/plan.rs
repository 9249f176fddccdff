//! Subscription plans and their value objects.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::Price;
use crate::domain::{Description, EntityId, FieldErrors, Name};

const SECONDS_PER_DAY: i64 = 86_400;
/// Shortest plan duration in seconds (two weeks).
pub const MIN_DURATION_SECONDS: i64 = 14 * SECONDS_PER_DAY;
/// Longest plan duration in seconds (four months, approximated as 120 days).
pub const MAX_DURATION_SECONDS: i64 = 120 * SECONDS_PER_DAY;

/// Validation errors for [`PlanDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationValidationError {
    TooShort,
    TooLong,
}

impl fmt::Display for DurationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "duration must be at least 2 weeks ({MIN_DURATION_SECONDS} seconds)"
            ),
            Self::TooLong => write!(
                f,
                "duration must not exceed 4 months ({MAX_DURATION_SECONDS} seconds)"
            ),
        }
    }
}

impl std::error::Error for DurationValidationError {}

/// Plan length in seconds, bounded to `[2 weeks, 120 days]` inclusive.
///
/// # Examples
/// ```
/// use assessmate::domain::PlanDuration;
///
/// assert!(PlanDuration::from_days(14).is_ok());
/// assert!(PlanDuration::from_days(121).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanDuration(i64);

impl PlanDuration {
    /// Validate a duration expressed in seconds.
    pub fn new(seconds: i64) -> Result<Self, DurationValidationError> {
        if seconds < MIN_DURATION_SECONDS {
            return Err(DurationValidationError::TooShort);
        }
        if seconds > MAX_DURATION_SECONDS {
            return Err(DurationValidationError::TooLong);
        }
        Ok(Self(seconds))
    }

    /// Validate a duration expressed in whole days.
    pub fn from_days(days: i64) -> Result<Self, DurationValidationError> {
        let seconds = days.checked_mul(SECONDS_PER_DAY).ok_or(if days < 0 {
            DurationValidationError::TooShort
        } else {
            DurationValidationError::TooLong
        })?;
        Self::new(seconds)
    }

    /// Length in seconds.
    #[must_use]
    pub fn as_seconds(self) -> i64 {
        self.0
    }

    /// Length in whole days, rounded down.
    #[must_use]
    pub fn as_days(self) -> i64 {
        self.0 / SECONDS_PER_DAY
    }

    /// Length as a chrono delta for date arithmetic.
    #[must_use]
    pub fn as_time_delta(self) -> TimeDelta {
        TimeDelta::seconds(self.0)
    }
}

/// Fields bounded by [`Limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitField {
    MaxQuestions,
    MaxMaterials,
    MaxUploadSize,
    TeacherCount,
}

impl LimitField {
    /// Field name reported in validation errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MaxQuestions => "max_questions",
            Self::MaxMaterials => "max_materials",
            Self::MaxUploadSize => "max_upload_size",
            Self::TeacherCount => "teacher_count",
        }
    }

    /// Inclusive upper bound.
    #[must_use]
    pub fn maximum(self) -> u32 {
        match self {
            Self::MaxQuestions => 40,
            Self::MaxMaterials => 3,
            Self::MaxUploadSize => 5,
            Self::TeacherCount => 200,
        }
    }
}

/// Raw limit input prior to validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitParams {
    pub max_questions: i64,
    pub max_materials: i64,
    pub max_upload_size: i64,
    pub teacher_count: i64,
}

/// Per-field limit violations, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitValidationError(FieldErrors);

impl LimitValidationError {
    /// Field-level failures keyed by limit field name.
    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.0
    }

    /// Consume into the underlying field errors.
    #[must_use]
    pub fn into_field_errors(self) -> FieldErrors {
        self.0
    }
}

impl fmt::Display for LimitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for LimitValidationError {}

/// Usage limits granted by a plan.
///
/// Each field is checked independently and every violation is named.
///
/// # Examples
/// ```
/// use assessmate::domain::{Limit, LimitParams};
///
/// let err = Limit::new(LimitParams {
///     max_questions: 41,
///     max_materials: 1,
///     max_upload_size: 9,
///     teacher_count: 10,
/// })
/// .expect_err("two fields over their bounds");
/// assert_eq!(
///     err.to_string(),
///     "max_questions cannot exceed 40; max_upload_size cannot exceed 5"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    max_questions: u32,
    max_materials: u32,
    max_upload_size: u32,
    teacher_count: u32,
}

impl Limit {
    /// Validate every field, collecting all violations.
    pub fn new(params: LimitParams) -> Result<Self, LimitValidationError> {
        let mut errors = FieldErrors::new();
        let max_questions = bounded(&mut errors, LimitField::MaxQuestions, params.max_questions);
        let max_materials = bounded(&mut errors, LimitField::MaxMaterials, params.max_materials);
        let max_upload_size =
            bounded(&mut errors, LimitField::MaxUploadSize, params.max_upload_size);
        let teacher_count = bounded(&mut errors, LimitField::TeacherCount, params.teacher_count);

        match (max_questions, max_materials, max_upload_size, teacher_count) {
            (Some(max_questions), Some(max_materials), Some(max_upload_size), Some(teacher_count)) => {
                Ok(Self {
                    max_questions,
                    max_materials,
                    max_upload_size,
                    teacher_count,
                })
            }
            _ => Err(LimitValidationError(errors)),
        }
    }

    /// Maximum questions per assessment.
    #[must_use]
    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    /// Maximum study materials per assessment.
    #[must_use]
    pub fn max_materials(&self) -> u32 {
        self.max_materials
    }

    /// Maximum upload size in megabytes.
    #[must_use]
    pub fn max_upload_size(&self) -> u32 {
        self.max_upload_size
    }

    /// Maximum number of teachers.
    #[must_use]
    pub fn teacher_count(&self) -> u32 {
        self.teacher_count
    }

    /// Raw view, used by response mapping.
    #[must_use]
    pub fn to_params(&self) -> LimitParams {
        LimitParams {
            max_questions: i64::from(self.max_questions),
            max_materials: i64::from(self.max_materials),
            max_upload_size: i64::from(self.max_upload_size),
            teacher_count: i64::from(self.teacher_count),
        }
    }
}

fn bounded(errors: &mut FieldErrors, field: LimitField, value: i64) -> Option<u32> {
    let name = field.name();
    let max = field.maximum();
    if value < 0 {
        errors.push(name, format!("{name} cannot be negative"));
        return None;
    }
    match u32::try_from(value) {
        Ok(v) if v <= max => Some(v),
        _ => {
            errors.push(name, format!("{name} cannot exceed {max}"));
            None
        }
    }
}

/// Who a plan is sold to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Personal,
    Institution,
}

impl SubscriptionType {
    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Institution => "institution",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown subscription type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubscriptionType(pub String);

impl fmt::Display for UnknownSubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid subscription type {:?}, expected personal or institution",
            self.0
        )
    }
}

impl std::error::Error for UnknownSubscriptionType {}

impl FromStr for SubscriptionType {
    type Err = UnknownSubscriptionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "institution" => Ok(Self::Institution),
            other => Err(UnknownSubscriptionType(other.to_owned())),
        }
    }
}

/// Unvalidated plan input.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionPlanDraft {
    pub name: String,
    pub description: String,
    pub duration_in_days: i64,
    pub amount_in_usd: f64,
    pub limit: LimitParams,
    pub subscription_type: String,
    pub is_active: bool,
}

/// A subscription offering.
///
/// Plans start without an identity; the repository assigns one on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionPlan {
    id: Option<EntityId>,
    name: Name,
    description: Description,
    duration: PlanDuration,
    price: Price,
    limit: Limit,
    subscription_type: SubscriptionType,
    is_active: bool,
}

impl SubscriptionPlan {
    /// Validate every field of `draft`, reporting all failures together.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::{LimitParams, SubscriptionPlan, SubscriptionPlanDraft};
    ///
    /// let errors = SubscriptionPlan::new(SubscriptionPlanDraft {
    ///     name: "x".into(),
    ///     description: String::new(),
    ///     duration_in_days: 3,
    ///     amount_in_usd: 10.0,
    ///     limit: LimitParams::default(),
    ///     subscription_type: "personal".into(),
    ///     is_active: true,
    /// })
    /// .expect_err("invalid draft");
    /// assert_eq!(errors.len(), 3);
    /// ```
    pub fn new(draft: SubscriptionPlanDraft) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", Name::new(&draft.name));
        let description = errors.check("description", Description::new(&draft.description));
        let duration = errors.check("durationInDays", PlanDuration::from_days(draft.duration_in_days));
        let price = errors.check("amountInUsd", Price::new(draft.amount_in_usd));
        let limit = match Limit::new(draft.limit) {
            Ok(limit) => Some(limit),
            Err(err) => {
                errors.merge_nested("limit", err.into_field_errors());
                None
            }
        };
        let subscription_type = errors.check(
            "subscriptionType",
            draft.subscription_type.parse::<SubscriptionType>(),
        );

        let (
            Some(name),
            Some(description),
            Some(duration),
            Some(price),
            Some(limit),
            Some(subscription_type),
        ) = (name, description, duration, price, limit, subscription_type)
        else {
            return Err(errors);
        };

        Ok(Self {
            id: None,
            name,
            description,
            duration,
            price,
            limit,
            subscription_type,
            is_active: draft.is_active,
        })
    }

    /// Record the identity assigned by persistence.
    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// Make the plan available for new subscriptions.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Withdraw the plan from sale.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Set the activation flag explicitly. Idempotent.
    pub fn set_active(&mut self, is_active: bool) {
        if is_active {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &Description {
        &self.description
    }

    #[must_use]
    pub fn duration(&self) -> PlanDuration {
        self.duration
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn limit(&self) -> Limit {
        self.limit
    }

    #[must_use]
    pub fn subscription_type(&self) -> SubscriptionType {
        self.subscription_type
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
