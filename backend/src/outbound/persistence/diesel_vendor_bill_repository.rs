//! PostgreSQL-backed `VendorBillRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VendorBillRepository, VendorBillRepositoryError};
use crate::domain::{OrganizationId, VendorBill, VendorBillDraft, VendorBillId, VendorBillStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewVendorBillRow, VendorBillRow};
use super::pool::{DbPool, PoolError};
use super::schema::vendor_bills;

#[derive(Clone)]
pub struct DieselVendorBillRepository {
    pool: DbPool,
}

impl DieselVendorBillRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VendorBillRepositoryError {
    map_basic_pool_error(error, |message| VendorBillRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> VendorBillRepositoryError {
    map_basic_diesel_error(
        error,
        VendorBillRepositoryError::query,
        VendorBillRepositoryError::connection,
    )
}

fn row_to_bill(row: VendorBillRow) -> Result<VendorBill, VendorBillRepositoryError> {
    let VendorBillRow {
        id,
        organization_id,
        vendor_name,
        amount_cents,
        currency,
        due_on,
        status,
        paid_at,
        created_at,
    } = row;

    Ok(VendorBill {
        id: VendorBillId::new(id)
            .map_err(|err| VendorBillRepositoryError::query(format!("stored bill id: {err}")))?,
        organization_id: OrganizationId::from_uuid(organization_id),
        vendor_name,
        amount_cents,
        currency,
        due_on,
        status: status.parse::<VendorBillStatus>().map_err(|err| {
            VendorBillRepositoryError::query(format!("stored bill status: {err}"))
        })?,
        paid_at,
        created_at,
    })
}

#[async_trait]
impl VendorBillRepository for DieselVendorBillRepository {
    async fn insert(
        &self,
        organization_id: &OrganizationId,
        draft: &VendorBillDraft,
    ) -> Result<VendorBill, VendorBillRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewVendorBillRow {
            organization_id: *organization_id.as_uuid(),
            vendor_name: draft.vendor_name(),
            amount_cents: draft.money().amount_cents(),
            currency: draft.money().currency().as_ref(),
            due_on: draft.due_on(),
        };

        let stored = diesel::insert_into(vendor_bills::table)
            .values(&row)
            .returning(VendorBillRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_bill(stored)
    }

    async fn list(
        &self,
        organization_id: &OrganizationId,
        status: Option<VendorBillStatus>,
    ) -> Result<Vec<VendorBill>, VendorBillRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = vendor_bills::table
            .filter(vendor_bills::organization_id.eq(*organization_id.as_uuid()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(vendor_bills::status.eq(status.as_str()));
        }

        let rows: Vec<VendorBillRow> = query
            .order((vendor_bills::due_on.asc(), vendor_bills::id.asc()))
            .select(VendorBillRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_bill).collect()
    }

    async fn mark_paid(
        &self,
        organization_id: &OrganizationId,
        bill_id: VendorBillId,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<VendorBill>, VendorBillRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            vendor_bills::table
                .filter(vendor_bills::id.eq(bill_id.get()))
                .filter(vendor_bills::organization_id.eq(*organization_id.as_uuid()))
                .filter(vendor_bills::status.eq(VendorBillStatus::Unpaid.as_str())),
        )
        .set((
            vendor_bills::status.eq(VendorBillStatus::Paid.as_str()),
            vendor_bills::paid_at.eq(paid_at),
        ))
        .returning(VendorBillRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_bill).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> VendorBillRow {
        VendorBillRow {
            id: 4,
            organization_id: Uuid::new_v4(),
            vendor_name: "Northwind Traders".to_owned(),
            amount_cents: 12_500,
            currency: "USD".to_owned(),
            due_on: NaiveDate::from_ymd_opt(2026, 5, 31).expect("valid date"),
            status: "unpaid".to_owned(),
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            VendorBillRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, VendorBillRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_parses_status(valid_row: VendorBillRow) {
        let bill = row_to_bill(valid_row).expect("valid row");
        assert_eq!(bill.status, VendorBillStatus::Unpaid);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut valid_row: VendorBillRow) {
        valid_row.status = "void".to_owned();

        let error = row_to_bill(valid_row).expect_err("unknown status");
        assert!(error.to_string().contains("stored bill status"));
    }
}
