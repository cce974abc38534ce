//! Internal Diesel row structs.
//!
//! Rows mirror `schema.rs` and never leave the persistence layer; each
//! repository converts them into validated domain types.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    expenses, invitations, memberships, notifications, projects, tasks, users, vendor_bills,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_digest: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = memberships)]
pub(crate) struct NewMembershipRow<'a> {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Projects and tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i32,
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub organization_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: i32,
    pub project_id: i32,
    pub title: String,
    pub status: String,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(crate) struct NewTaskRow<'a> {
    pub project_id: i32,
    pub title: &'a str,
    pub assignee_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Expenses and vendor bills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: i32,
    pub organization_id: Uuid,
    pub submitted_by: Uuid,
    pub project_id: Option<i32>,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub incurred_on: NaiveDate,
    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_by: Option<Uuid>,
    pub paid_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expenses)]
pub(crate) struct NewExpenseRow<'a> {
    pub organization_id: Uuid,
    pub submitted_by: Uuid,
    pub project_id: Option<i32>,
    pub description: &'a str,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub incurred_on: NaiveDate,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vendor_bills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VendorBillRow {
    pub id: i32,
    pub organization_id: Uuid,
    pub vendor_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub due_on: NaiveDate,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vendor_bills)]
pub(crate) struct NewVendorBillRow<'a> {
    pub organization_id: Uuid,
    pub vendor_name: &'a str,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub due_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Invitations and notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvitationRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub role: String,
    pub invited_by: Uuid,
    pub status: String,
    pub accepted_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub(crate) struct NewInvitationRow<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: &'a str,
    pub role: &'a str,
    pub invited_by: Uuid,
    pub status: &'a str,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub kind: String,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub kind: &'a str,
    pub message: &'a str,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
