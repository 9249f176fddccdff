//! Prices and currency conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest listing amount accepted by [`Price::new`].
pub const MAX_PRICE_AMOUNT: f64 = 10_000_000.0;

/// Supported settlement currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Ngn,
}

impl Currency {
    /// ISO 4217 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Ngn => "NGN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raised when parsing an unknown currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency(pub String);

impl fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported currency: {}", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "NGN" => Ok(Self::Ngn),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

/// Fixed exchange rate table. Pairs not listed here cannot be converted.
#[must_use]
pub fn exchange_rate(from: Currency, to: Currency) -> Option<f64> {
    use Currency::{Eur, Gbp, Ngn, Usd};
    match (from, to) {
        (Usd, Eur) => Some(0.92),
        (Usd, Gbp) => Some(0.79),
        (Usd, Ngn) => Some(1470.0),
        (Eur, Usd) => Some(1.09),
        (Eur, Gbp) => Some(0.86),
        (Eur, Ngn) => Some(1600.0),
        _ => None,
    }
}

/// Validation errors for [`Price`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceValidationError {
    Negative,
    ExceedsMaximum { max: f64 },
    NotFinite,
}

impl fmt::Display for PriceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "price amount cannot be negative"),
            Self::ExceedsMaximum { max } => write!(f, "price amount cannot exceed {max}"),
            Self::NotFinite => write!(f, "price amount must be a finite number"),
        }
    }
}

impl std::error::Error for PriceValidationError {}

/// Raised when converting between currencies without a known rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionError {
    pub from: Currency,
    pub to: Currency,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no exchange rate found from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for ConversionError {}

/// Monetary amount in a given currency.
///
/// Listing prices are bounded to `[0, MAX_PRICE_AMOUNT]`. Converted prices
/// are derived values and may exceed the listing bound.
///
/// # Examples
/// ```
/// use assessmate::domain::{Currency, Price};
///
/// let price = Price::new(100.0).expect("valid price");
/// assert_eq!(price.currency(), Currency::Usd);
/// let euros = price.convert(Currency::Eur).expect("rate exists");
/// assert_eq!(euros.amount(), 92.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    amount: f64,
    currency: Currency,
}

impl Price {
    /// Validate a listing amount in the default currency (USD).
    pub fn new(amount: f64) -> Result<Self, PriceValidationError> {
        Self::with_currency(amount, Currency::default())
    }

    /// Validate a listing amount in an explicit currency.
    pub fn with_currency(amount: f64, currency: Currency) -> Result<Self, PriceValidationError> {
        if !amount.is_finite() {
            return Err(PriceValidationError::NotFinite);
        }
        if amount < 0.0 {
            return Err(PriceValidationError::Negative);
        }
        if amount > MAX_PRICE_AMOUNT {
            return Err(PriceValidationError::ExceedsMaximum {
                max: MAX_PRICE_AMOUNT,
            });
        }
        Ok(Self { amount, currency })
    }

    /// Amount in [`Self::currency`].
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Currency of the amount.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Convert to `target` using the fixed rate table, rounding to two
    /// decimal places half away from zero.
    pub fn convert(&self, target: Currency) -> Result<Self, ConversionError> {
        if self.currency == target {
            return Ok(*self);
        }
        let rate = exchange_rate(self.currency, target).ok_or(ConversionError {
            from: self.currency,
            to: target,
        })?;
        Ok(Self {
            amount: (self.amount * rate * 100.0).round() / 100.0,
            currency: target,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_amount_defaults_to_usd() {
        let price = Price::new(0.0).expect("zero is valid");
        assert_eq!(price.amount(), 0.0);
        assert_eq!(price.currency(), Currency::Usd);
    }

    #[rstest]
    #[case(-1.0, PriceValidationError::Negative)]
    #[case(10_000_001.0, PriceValidationError::ExceedsMaximum { max: MAX_PRICE_AMOUNT })]
    #[case(f64::NAN, PriceValidationError::NotFinite)]
    fn rejects_out_of_range_amounts(#[case] amount: f64, #[case] expected: PriceValidationError) {
        assert_eq!(Price::new(amount), Err(expected));
    }

    #[test]
    fn maximum_amount_is_inclusive() {
        assert!(Price::new(MAX_PRICE_AMOUNT).is_ok());
    }

    #[test]
    fn same_currency_conversion_is_identity() {
        let price = Price::new(12.345).expect("valid price");
        assert_eq!(price.convert(Currency::Usd), Ok(price));
    }

    #[rstest]
    #[case(Currency::Gbp, 7.9)]
    #[case(Currency::Ngn, 14_700.0)]
    #[case(Currency::Eur, 9.2)]
    fn converts_from_usd(#[case] target: Currency, #[case] expected: f64) {
        let converted = Price::new(10.0)
            .expect("valid price")
            .convert(target)
            .expect("rate exists");
        assert_eq!(converted.amount(), expected);
        assert_eq!(converted.currency(), target);
    }

    #[test]
    fn conversion_rounds_to_two_places() {
        let converted = Price::new(10.555)
            .expect("valid price")
            .convert(Currency::Eur)
            .expect("rate exists");
        assert_eq!(converted.amount(), 9.71);
    }

    #[test]
    fn missing_rate_pair_is_an_error() {
        let price = Price::with_currency(5.0, Currency::Gbp).expect("valid price");
        let err = price.convert(Currency::Usd).expect_err("no rate");
        assert_eq!(err.to_string(), "no exchange rate found from GBP to USD");
    }

    #[rstest]
    #[case("usd", Currency::Usd)]
    #[case(" NGN ", Currency::Ngn)]
    fn parses_currency_codes(#[case] raw: &str, #[case] expected: Currency) {
        assert_eq!(raw.parse::<Currency>(), Ok(expected));
    }
}
