//! Vendor bill domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::authorize;
use crate::domain::ports::{
    OrganizationRepository, VendorBillCommand, VendorBillQuery, VendorBillRepository,
    VendorBillRepositoryError, bill_payment_conflict,
};
use crate::domain::{
    Action, Caller, Error, VendorBill, VendorBillDraft, VendorBillId, VendorBillStatus,
};

/// Vendor bill service implementing [`VendorBillCommand`] and
/// [`VendorBillQuery`].
#[derive(Clone)]
pub struct VendorBillService<R, O> {
    bills: Arc<R>,
    organizations: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<R, O> VendorBillService<R, O> {
    pub fn new(bills: Arc<R>, organizations: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bills,
            organizations,
            clock,
        }
    }
}

fn map_vendor_bill_error(error: VendorBillRepositoryError) -> Error {
    match error {
        VendorBillRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("vendor bill repository unavailable: {message}"))
        }
        VendorBillRepositoryError::Query { message } => {
            Error::internal(format!("vendor bill repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R, O> VendorBillCommand for VendorBillService<R, O>
where
    R: VendorBillRepository,
    O: OrganizationRepository,
{
    async fn create(&self, caller: &Caller, draft: VendorBillDraft) -> Result<VendorBill, Error> {
        authorize(self.organizations.as_ref(), caller, Action::CreateVendorBill).await?;
        let bill = self
            .bills
            .insert(&caller.organization_id, &draft)
            .await
            .map_err(map_vendor_bill_error)?;
        info!(
            bill_id = %bill.id,
            organization_id = %caller.organization_id,
            "vendor bill recorded"
        );
        Ok(bill)
    }

    async fn mark_paid(&self, caller: &Caller, bill_id: VendorBillId) -> Result<VendorBill, Error> {
        authorize(self.organizations.as_ref(), caller, Action::PayVendorBill).await?;
        let bill = self
            .bills
            .mark_paid(&caller.organization_id, bill_id, self.clock.utc())
            .await
            .map_err(map_vendor_bill_error)?
            .ok_or_else(|| bill_payment_conflict(bill_id))?;
        info!(
            bill_id = %bill_id,
            organization_id = %caller.organization_id,
            actor = %caller.user_id,
            "vendor bill paid"
        );
        Ok(bill)
    }
}

#[async_trait]
impl<R, O> VendorBillQuery for VendorBillService<R, O>
where
    R: VendorBillRepository,
    O: OrganizationRepository,
{
    async fn list(
        &self,
        caller: &Caller,
        status: Option<VendorBillStatus>,
    ) -> Result<Vec<VendorBill>, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        self.bills
            .list(&caller.organization_id, status)
            .await
            .map_err(map_vendor_bill_error)
    }
}
