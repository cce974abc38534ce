//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Organizations owning projects, expenses and bills.
    organizations (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts. E-mail addresses are stored lower-cased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Varchar,
        /// Argon2id PHC string.
        password_digest -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Organization membership carrying the member's role.
    memberships (organization_id, user_id) {
        organization_id -> Uuid,
        user_id -> Uuid,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    projects (id) {
        id -> Int4,
        organization_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        status -> Varchar,
        created_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Int4,
        project_id -> Int4,
        title -> Varchar,
        status -> Varchar,
        assignee_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Expense claims moving through the approval workflow.
    expenses (id) {
        id -> Int4,
        organization_id -> Uuid,
        submitted_by -> Uuid,
        project_id -> Nullable<Int4>,
        description -> Varchar,
        amount_cents -> Int8,
        currency -> Varchar,
        incurred_on -> Date,
        status -> Varchar,
        approved_by -> Nullable<Uuid>,
        approved_at -> Nullable<Timestamptz>,
        paid_by -> Nullable<Uuid>,
        paid_at -> Nullable<Timestamptz>,
        rejected_by -> Nullable<Uuid>,
        rejected_at -> Nullable<Timestamptz>,
        rejection_reason -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    vendor_bills (id) {
        id -> Int4,
        organization_id -> Uuid,
        vendor_name -> Varchar,
        amount_cents -> Int8,
        currency -> Varchar,
        due_on -> Date,
        status -> Varchar,
        paid_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    invitations (id) {
        id -> Uuid,
        organization_id -> Uuid,
        email -> Varchar,
        role -> Varchar,
        invited_by -> Uuid,
        status -> Varchar,
        accepted_by -> Nullable<Uuid>,
        accepted_at -> Nullable<Timestamptz>,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notifications; `read_at IS NULL` marks unread rows.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        organization_id -> Nullable<Uuid>,
        kind -> Varchar,
        message -> Text,
        read_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(memberships -> organizations (organization_id));
diesel::joinable!(memberships -> users (user_id));
diesel::joinable!(projects -> organizations (organization_id));
diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(expenses -> organizations (organization_id));
diesel::joinable!(vendor_bills -> organizations (organization_id));
diesel::joinable!(invitations -> organizations (organization_id));

diesel::allow_tables_to_appear_in_same_query!(
    organizations,
    users,
    memberships,
    projects,
    tasks,
    expenses,
    vendor_bills,
    invitations,
    notifications,
);
