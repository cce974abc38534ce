//! Driving port for vendor bill mutations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Caller, Error, VendorBill, VendorBillDraft, VendorBillId, VendorBillStatus};

/// Conflict raised when a bill is missing or already paid.
pub fn bill_payment_conflict(bill_id: VendorBillId) -> Error {
    Error::conflict(format!(
        "vendor bill {bill_id} cannot be paid: it is missing or not unpaid"
    ))
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorBillCommand: Send + Sync {
    async fn create(&self, caller: &Caller, draft: VendorBillDraft) -> Result<VendorBill, Error>;

    /// `unpaid → paid`.
    async fn mark_paid(&self, caller: &Caller, bill_id: VendorBillId)
    -> Result<VendorBill, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVendorBillCommand;

#[async_trait]
impl VendorBillCommand for FixtureVendorBillCommand {
    async fn create(&self, caller: &Caller, draft: VendorBillDraft) -> Result<VendorBill, Error> {
        let id = VendorBillId::new(1)
            .map_err(|err| Error::internal(format!("invalid fixture bill id: {err}")))?;
        Ok(VendorBill {
            id,
            organization_id: caller.organization_id,
            vendor_name: draft.vendor_name().to_owned(),
            amount_cents: draft.money().amount_cents(),
            currency: draft.money().currency().as_ref().to_owned(),
            due_on: draft.due_on(),
            status: VendorBillStatus::Unpaid,
            paid_at: None,
            created_at: Utc::now(),
        })
    }

    async fn mark_paid(
        &self,
        _caller: &Caller,
        bill_id: VendorBillId,
    ) -> Result<VendorBill, Error> {
        Err(bill_payment_conflict(bill_id))
    }
}
