//! Vendor bills and their `unpaid → paid` transition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Currency, Money, MoneyValidationError, OrganizationId, ParseStatusError, VendorBillId};

/// Payment state of a vendor bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorBillStatus {
    Unpaid,
    Paid,
}

impl VendorBillStatus {
    pub const ALL: [Self; 2] = [Self::Unpaid, Self::Paid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for VendorBillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorBillStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Maximum vendor name length in characters.
pub const VENDOR_NAME_MAX: usize = 200;

/// Validation errors for vendor bill inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VendorBillValidationError {
    #[error("vendor name must not be empty")]
    EmptyVendorName,
    #[error("vendor name must be at most {max} characters")]
    VendorNameTooLong { max: usize },
    #[error(transparent)]
    Money(#[from] MoneyValidationError),
}

/// Validated input for recording a new bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorBillDraft {
    vendor_name: String,
    money: Money,
    due_on: NaiveDate,
}

impl VendorBillDraft {
    pub fn new(
        vendor_name: &str,
        amount_cents: i64,
        currency: &str,
        due_on: NaiveDate,
    ) -> Result<Self, VendorBillValidationError> {
        let vendor_name = vendor_name.trim();
        if vendor_name.is_empty() {
            return Err(VendorBillValidationError::EmptyVendorName);
        }
        if vendor_name.chars().count() > VENDOR_NAME_MAX {
            return Err(VendorBillValidationError::VendorNameTooLong {
                max: VENDOR_NAME_MAX,
            });
        }
        let money = Money::new(amount_cents, Currency::new(currency)?)?;
        Ok(Self {
            vendor_name: vendor_name.to_owned(),
            money,
            due_on,
        })
    }

    pub fn vendor_name(&self) -> &str {
        self.vendor_name.as_str()
    }

    pub fn money(&self) -> &Money {
        &self.money
    }

    pub fn due_on(&self) -> NaiveDate {
        self.due_on
    }
}

/// Vendor bill as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBill {
    pub id: VendorBillId,
    pub organization_id: OrganizationId,
    pub vendor_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub due_on: NaiveDate,
    pub status: VendorBillStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
