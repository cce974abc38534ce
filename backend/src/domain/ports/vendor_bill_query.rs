//! Driving port for vendor bill reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, VendorBill, VendorBillStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorBillQuery: Send + Sync {
    async fn list(
        &self,
        caller: &Caller,
        status: Option<VendorBillStatus>,
    ) -> Result<Vec<VendorBill>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVendorBillQuery;

#[async_trait]
impl VendorBillQuery for FixtureVendorBillQuery {
    async fn list(
        &self,
        _caller: &Caller,
        _status: Option<VendorBillStatus>,
    ) -> Result<Vec<VendorBill>, Error> {
        Ok(Vec::new())
    }
}
