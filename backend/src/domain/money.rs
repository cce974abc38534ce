//! Monetary amounts stored as integer minor units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest accepted amount in minor units (100 billion major units).
///
/// The `amount_cents` CHECK constraints carry the same bound.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000_000;

/// Validation errors for [`Money`] and [`Currency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(i64),
    #[error("amount must not exceed {MAX_AMOUNT_CENTS} minor units, got {0}")]
    AmountTooLarge(i64),
    #[error("currency must be a three-letter ISO 4217 code, got {0:?}")]
    InvalidCurrency(String),
}

/// Upper-case ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Validate a currency code. Lower-case input is upper-cased.
    pub fn new(code: impl AsRef<str>) -> Result<Self, MoneyValidationError> {
        let raw = code.as_ref();
        let normalised = raw.trim().to_ascii_uppercase();
        if normalised.len() == 3 && normalised.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(normalised))
        } else {
            Err(MoneyValidationError::InvalidCurrency(raw.to_owned()))
        }
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Strictly positive amount of money in minor units, capped at
/// [`MAX_AMOUNT_CENTS`].
///
/// # Examples
/// ```
/// use opsdesk::domain::{Currency, Money};
///
/// let money = Money::new(1250, Currency::new("eur").unwrap()).unwrap();
/// assert_eq!(money.amount_cents(), 1250);
/// assert_eq!(money.currency().as_ref(), "EUR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    amount_cents: i64,
    currency: Currency,
}

impl Money {
    /// Validate the amount and pair it with a currency.
    pub fn new(amount_cents: i64, currency: Currency) -> Result<Self, MoneyValidationError> {
        if amount_cents <= 0 {
            return Err(MoneyValidationError::NonPositiveAmount(amount_cents));
        }
        if amount_cents > MAX_AMOUNT_CENTS {
            return Err(MoneyValidationError::AmountTooLarge(amount_cents));
        }
        Ok(Self {
            amount_cents,
            currency,
        })
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.amount_cents / 100;
        let minor = self.amount_cents % 100;
        write!(f, "{major}.{minor:02} {}", self.currency.as_ref())
    }
}
