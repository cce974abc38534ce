//! Aggregate statistics computed on read.
//!
//! Every counter defaults to zero so an organization or user without
//! related records yields a zeroed report.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ExpenseStatus, OrganizationId, UserId, VendorBillStatus};

/// Count and summed amount for a group of money-bearing records.
///
/// Sums span currencies; callers needing per-currency totals filter first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountTally {
    pub count: i64,
    pub total_cents: i64,
}

impl AmountTally {
    /// Accumulate `other`, saturating at `i64::MAX`.
    pub fn add(&mut self, other: Self) {
        self.count = self.count.saturating_add(other.count);
        self.total_cents = self.total_cents.saturating_add(other.total_cents);
    }
}

/// Per-status tallies keyed by the status wire name.
///
/// Every known status is present, zeroed when no rows match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown(BTreeMap<&'static str, AmountTally>);

impl StatusBreakdown {
    fn zeroed(statuses: impl IntoIterator<Item = &'static str>) -> Self {
        Self(
            statuses
                .into_iter()
                .map(|status| (status, AmountTally::default()))
                .collect(),
        )
    }

    /// Zeroed breakdown over every expense status.
    pub fn for_expenses() -> Self {
        Self::zeroed(ExpenseStatus::ALL.map(ExpenseStatus::as_str))
    }

    /// Zeroed breakdown over every vendor bill status.
    pub fn for_vendor_bills() -> Self {
        Self::zeroed(VendorBillStatus::ALL.map(VendorBillStatus::as_str))
    }

    /// Add a grouped row. Unknown statuses are ignored.
    pub fn record(&mut self, status: &str, tally: AmountTally) {
        if let Some(slot) = self.0.get_mut(status) {
            slot.add(tally);
        }
    }

    pub fn get(&self, status: &str) -> AmountTally {
        self.0.get(status).copied().unwrap_or_default()
    }

    /// Tally across all statuses.
    pub fn total(&self) -> AmountTally {
        self.0.values().fold(AmountTally::default(), |mut acc, tally| {
            acc.add(*tally);
            acc
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCounts {
    pub active: i64,
    pub archived: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

/// Organization-wide aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub organization_id: OrganizationId,
    pub member_count: i64,
    pub projects: ProjectCounts,
    pub tasks: TaskCounts,
    pub expenses: AmountTally,
    pub expenses_by_status: StatusBreakdown,
    pub vendor_bills: AmountTally,
    pub vendor_bills_by_status: StatusBreakdown,
    pub pending_invitations: i64,
}

impl OrganizationStats {
    pub fn zeroed(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            member_count: 0,
            projects: ProjectCounts::default(),
            tasks: TaskCounts::default(),
            expenses: AmountTally::default(),
            expenses_by_status: StatusBreakdown::for_expenses(),
            vendor_bills: AmountTally::default(),
            vendor_bills_by_status: StatusBreakdown::for_vendor_bills(),
            pending_invitations: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTaskCounts {
    pub open: i64,
    pub done: i64,
}

/// Aggregates for one user within one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub expenses_submitted: AmountTally,
    pub expenses_by_status: StatusBreakdown,
    pub tasks_assigned: AssignedTaskCounts,
    pub unread_notifications: i64,
}

impl UserStats {
    pub fn zeroed(user_id: UserId, organization_id: OrganizationId) -> Self {
        Self {
            user_id,
            organization_id,
            expenses_submitted: AmountTally::default(),
            expenses_by_status: StatusBreakdown::for_expenses(),
            tasks_assigned: AssignedTaskCounts::default(),
            unread_notifications: 0,
        }
    }
}
