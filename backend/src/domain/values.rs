//! Shared value objects: identifiers, names, descriptions, and emails.
//!
//! Each type is constructed through a fallible factory and cannot exist in an
//! invalid state. Inputs are trimmed before validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum length of a [`Name`].
pub const NAME_MIN: usize = 3;
/// Maximum length of a [`Name`].
pub const NAME_MAX: usize = 100;
/// Minimum length of a [`Description`].
pub const DESCRIPTION_MIN: usize = 150;
/// Maximum length of a [`Description`].
pub const DESCRIPTION_MAX: usize = 800;

/// Validation errors for [`EntityId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdValidationError {
    Zero,
    Negative,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "id cannot be zero"),
            Self::Negative => write!(f, "id cannot be negative"),
        }
    }
}

impl std::error::Error for IdValidationError {}

/// Positive integer identity assigned by the persistence adapter.
///
/// # Examples
/// ```
/// use assessmate::domain::EntityId;
///
/// assert_eq!(EntityId::new(7).expect("valid id").value(), 7);
/// assert!(EntityId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntityId(i64);

impl EntityId {
    /// Validate and construct an identifier.
    pub fn new(value: i64) -> Result<Self, IdValidationError> {
        match value {
            0 => Err(IdValidationError::Zero),
            v if v < 0 => Err(IdValidationError::Negative),
            v => Ok(Self(v)),
        }
    }

    /// Raw integer value.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for EntityId {
    type Error = IdValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for i64 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

/// Validation errors for bounded text values such as [`Name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextValidationError {
    Empty { label: &'static str },
    TooShort { label: &'static str, min: usize },
    TooLong { label: &'static str, max: usize },
}

impl fmt::Display for TextValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { label } => write!(f, "{label} cannot be empty"),
            Self::TooShort { label, min } => {
                write!(f, "{label} must be at least {min} characters long")
            }
            Self::TooLong { label, max } => write!(f, "{label} must not exceed {max} characters"),
        }
    }
}

impl std::error::Error for TextValidationError {}

pub(crate) fn bounded_text(
    raw: &str,
    label: &'static str,
    min: usize,
    max: usize,
) -> Result<String, TextValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TextValidationError::Empty { label });
    }
    let length = trimmed.chars().count();
    if length < min {
        return Err(TextValidationError::TooShort { label, min });
    }
    if length > max {
        return Err(TextValidationError::TooLong { label, max });
    }
    Ok(trimmed.to_owned())
}

macro_rules! bounded_text_type {
    ($(#[$meta:meta])* $name:ident, $label:literal, $min:expr, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, TextValidationError> {
                bounded_text(raw.as_ref(), $label, $min, $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TextValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_text_type!(
    /// Display name for plans, users, institutions, staff, groups, and courses.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::Name;
    ///
    /// let name = Name::new("  Starter  ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Starter");
    /// assert!(Name::new("ab").is_err());
    /// ```
    Name,
    "name",
    NAME_MIN,
    NAME_MAX
);

bounded_text_type!(
    /// Long-form description for plans, institutions, groups, and courses.
    Description,
    "description",
    DESCRIPTION_MIN,
    DESCRIPTION_MAX
);

/// Validation errors for [`Email`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    InvalidFormat,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email cannot be empty"),
            Self::InvalidFormat => write!(f, "invalid email format"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
}

/// Trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim and validate an address.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::Email;
    ///
    /// assert!(Email::new(" a@b.com ").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_some_and(|re| re.is_match(trimmed)) {
            return Err(EmailValidationError::InvalidFormat);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Case-insensitive comparison used for lookups.
    #[must_use]
    pub fn matches(&self, other: &Email) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// A page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    /// Items returned by the query.
    pub items: Vec<T>,
    /// Total number of matching items.
    pub total: usize,
}

impl<T> Listing<T> {
    /// Build a listing whose total is the number of items.
    #[must_use]
    pub fn complete(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }

    /// Transform each item, preserving the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
