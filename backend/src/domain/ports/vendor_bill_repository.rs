//! Port for vendor bill persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OrganizationId, VendorBill, VendorBillDraft, VendorBillId, VendorBillStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vendor bill repository adapters.
    pub enum VendorBillRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "vendor bill repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "vendor bill repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorBillRepository: Send + Sync {
    /// Record a new unpaid bill.
    async fn insert(
        &self,
        organization_id: &OrganizationId,
        draft: &VendorBillDraft,
    ) -> Result<VendorBill, VendorBillRepositoryError>;

    /// List an organization's bills ordered by due date.
    async fn list(
        &self,
        organization_id: &OrganizationId,
        status: Option<VendorBillStatus>,
    ) -> Result<Vec<VendorBill>, VendorBillRepositoryError>;

    /// Move an unpaid bill to paid. `Ok(None)` when no unpaid bill matched.
    async fn mark_paid(
        &self,
        organization_id: &OrganizationId,
        bill_id: VendorBillId,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<VendorBill>, VendorBillRepositoryError>;
}
