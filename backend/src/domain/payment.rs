//! Payment transactions raised against purchasable entities.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use url::Url;

use super::{EntityId, Price};

/// Payment providers the platform can settle through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Paystack,
    Mono,
    Korahpay,
}

impl ProviderType {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paystack => "paystack",
            Self::Mono => "mono",
            Self::Korahpay => "korahpay",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unrecognised provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the provider type {:?} is not recognized", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for ProviderType {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "paystack" => Ok(Self::Paystack),
            "mono" => Ok(Self::Mono),
            "korahpay" => Ok(Self::Korahpay),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}

/// Kinds of entity a transaction can pay for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionEntityKind {
    Subscription,
}

/// The entity a transaction settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionEntity {
    pub kind: TransactionEntityKind,
    pub id: EntityId,
}

impl TransactionEntity {
    /// Reference a subscription.
    #[must_use]
    pub fn subscription(id: EntityId) -> Self {
        Self {
            kind: TransactionEntityKind::Subscription,
            id,
        }
    }
}

/// Raised when a checkout link is not an absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPaymentLink(pub String);

impl fmt::Display for InvalidPaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid payment link: {}", self.0)
    }
}

impl std::error::Error for InvalidPaymentLink {}

/// Absolute http(s) checkout URL returned by a provider.
///
/// # Examples
/// ```
/// use assessmate::domain::PaymentLink;
///
/// assert!(PaymentLink::parse("https://checkout.example.com/abc").is_ok());
/// assert!(PaymentLink::parse("ftp://checkout.example.com/abc").is_err());
/// assert!(PaymentLink::parse("/relative").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentLink(Url);

impl PaymentLink {
    /// Parse and validate a checkout URL.
    pub fn parse(raw: &str) -> Result<Self, InvalidPaymentLink> {
        let url = Url::parse(raw.trim()).map_err(|_| InvalidPaymentLink(raw.to_owned()))?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(Self(url)),
            _ => Err(InvalidPaymentLink(raw.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Errors raised by [`Meta`] mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    EmptyKey,
    DuplicateKey(String),
    MissingKey(String),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "key cannot be empty"),
            Self::DuplicateKey(key) => write!(f, "key {key:?} already exists in meta"),
            Self::MissingKey(key) => write!(f, "key {key:?} does not exist in meta"),
        }
    }
}

impl std::error::Error for MetaError {}

/// Free-form string attributes attached to payments.
///
/// # Examples
/// ```
/// use assessmate::domain::Meta;
///
/// let mut meta = Meta::default();
/// meta.add("plan", "gold").expect("new key");
/// assert!(meta.add(" plan ", "silver").is_err());
/// assert_eq!(meta.get("plan"), Some("gold"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(BTreeMap<String, String>);

impl Meta {
    /// Insert a new key. Keys are trimmed; existing keys are not overwritten.
    pub fn add(&mut self, key: &str, value: impl Into<String>) -> Result<(), MetaError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(MetaError::EmptyKey);
        }
        if self.0.contains_key(key) {
            return Err(MetaError::DuplicateKey(key.to_owned()));
        }
        self.0.insert(key.to_owned(), value.into());
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key.trim()).map(String::as_str)
    }

    /// Remove an existing key, returning its value.
    pub fn remove(&mut self, key: &str) -> Result<String, MetaError> {
        let key = key.trim();
        self.0
            .remove(key)
            .ok_or_else(|| MetaError::MissingKey(key.to_owned()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A payment attempt for a single entity.
///
/// Transactions start pending; [`Transaction::mark_paid`] settles them.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: Option<EntityId>,
    provider: ProviderType,
    provider_transaction_id: Option<String>,
    amount: Price,
    paid_at: Option<DateTime<Utc>>,
    entity: TransactionEntity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    payment_link: Option<PaymentLink>,
    meta: Meta,
}

impl Transaction {
    /// Build an unpaid transaction for `entity`.
    #[must_use]
    pub fn pending(
        provider: ProviderType,
        amount: Price,
        entity: TransactionEntity,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            provider,
            provider_transaction_id: None,
            amount,
            paid_at: None,
            entity,
            created_at: now,
            updated_at: now,
            payment_link: None,
            meta: Meta::default(),
        }
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// Store the provider's reference and checkout link.
    pub fn attach_provider_reference(
        &mut self,
        reference: impl Into<String>,
        link: PaymentLink,
        now: DateTime<Utc>,
    ) {
        self.provider_transaction_id = Some(reference.into());
        self.payment_link = Some(link);
        self.updated_at = now;
    }

    /// Settle the transaction. Repeated calls keep the first payment time.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) {
        if self.paid_at.is_none() {
            self.paid_at = Some(now);
        }
        self.updated_at = now;
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    #[must_use]
    pub fn provider(&self) -> ProviderType {
        self.provider
    }

    #[must_use]
    pub fn provider_transaction_id(&self) -> Option<&str> {
        self.provider_transaction_id.as_deref()
    }

    #[must_use]
    pub fn amount(&self) -> Price {
        self.amount
    }

    #[must_use]
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    #[must_use]
    pub fn entity(&self) -> TransactionEntity {
        self.entity
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn payment_link(&self) -> Option<&PaymentLink> {
        self.payment_link.as_ref()
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}
