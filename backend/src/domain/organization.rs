//! Organizations, membership roles and the role permission table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable organization identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(Uuid);

impl OrganizationId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role a user holds within one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    ProjectManager,
    Finance,
    Member,
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl Role {
    /// Stable storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::ProjectManager => "project_manager",
            Self::Finance => "finance",
            Self::Member => "member",
        }
    }

    /// Whether this role may perform `action`.
    ///
    /// # Examples
    /// ```
    /// use opsdesk::domain::{Action, Role};
    ///
    /// assert!(Role::Finance.permits(Action::PayExpense));
    /// assert!(!Role::Finance.permits(Action::ApproveExpense));
    /// ```
    pub fn permits(self, action: Action) -> bool {
        action.allowed_roles().contains(&self)
    }

    /// Whether a holder of this role may hand `granted` to someone else.
    ///
    /// A role can only be granted by a role that permits every action the
    /// granted role does, so only admins create admins or finance users.
    ///
    /// # Examples
    /// ```
    /// use opsdesk::domain::Role;
    ///
    /// assert!(Role::Manager.may_grant(Role::ProjectManager));
    /// assert!(!Role::Manager.may_grant(Role::Finance));
    /// ```
    pub fn may_grant(self, granted: Self) -> bool {
        Action::ALL
            .iter()
            .all(|action| !granted.permits(*action) || self.permits(*action))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "project_manager" => Ok(Self::ProjectManager),
            "finance" => Ok(Self::Finance),
            "member" => Ok(Self::Member),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// Role-gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read records belonging to the organization.
    ReadRecords,
    SubmitExpense,
    ApproveExpense,
    RejectExpense,
    PayExpense,
    ReassignExpenseProject,
    CreateVendorBill,
    PayVendorBill,
    CreateProject,
    ManageTasks,
    InviteMembers,
    ViewOrganizationStats,
}

const EVERY_ROLE: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::ProjectManager,
    Role::Finance,
    Role::Member,
];
const REVIEWERS: &[Role] = &[Role::Admin, Role::Manager, Role::ProjectManager];
const PAYERS: &[Role] = &[Role::Admin, Role::Finance];
const FINANCE_EDITORS: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::ProjectManager,
    Role::Finance,
];
const INVITERS: &[Role] = &[Role::Admin, Role::Manager];
const STATS_VIEWERS: &[Role] = &[Role::Admin, Role::Manager, Role::Finance];

impl Action {
    /// Every role-gated action.
    pub const ALL: [Self; 12] = [
        Self::ReadRecords,
        Self::SubmitExpense,
        Self::ApproveExpense,
        Self::RejectExpense,
        Self::PayExpense,
        Self::ReassignExpenseProject,
        Self::CreateVendorBill,
        Self::PayVendorBill,
        Self::CreateProject,
        Self::ManageTasks,
        Self::InviteMembers,
        Self::ViewOrganizationStats,
    ];

    /// Roles allowed to perform this action.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::ReadRecords | Self::SubmitExpense => EVERY_ROLE,
            Self::ApproveExpense
            | Self::RejectExpense
            | Self::CreateProject
            | Self::ManageTasks => REVIEWERS,
            Self::PayExpense | Self::CreateVendorBill | Self::PayVendorBill => PAYERS,
            Self::ReassignExpenseProject => FINANCE_EDITORS,
            Self::InviteMembers => INVITERS,
            Self::ViewOrganizationStats => STATS_VIEWERS,
        }
    }

    /// Short phrase used in authorisation failures.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ReadRecords => "read organization records",
            Self::SubmitExpense => "submit expenses",
            Self::ApproveExpense => "approve expenses",
            Self::RejectExpense => "reject expenses",
            Self::PayExpense => "pay expenses",
            Self::ReassignExpenseProject => "reassign expense projects",
            Self::CreateVendorBill => "create vendor bills",
            Self::PayVendorBill => "pay vendor bills",
            Self::CreateProject => "create projects",
            Self::ManageTasks => "manage tasks",
            Self::InviteMembers => "invite members",
            Self::ViewOrganizationStats => "view organization stats",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Action::ApproveExpense, &[Role::Admin, Role::Manager, Role::ProjectManager])]
    #[case(Action::RejectExpense, &[Role::Admin, Role::Manager, Role::ProjectManager])]
    #[case(Action::PayExpense, &[Role::Admin, Role::Finance])]
    #[case(Action::PayVendorBill, &[Role::Admin, Role::Finance])]
    #[case(Action::CreateVendorBill, &[Role::Admin, Role::Finance])]
    #[case(
        Action::ReassignExpenseProject,
        &[Role::Admin, Role::Manager, Role::ProjectManager, Role::Finance]
    )]
    #[case(Action::InviteMembers, &[Role::Admin, Role::Manager])]
    #[case(Action::ViewOrganizationStats, &[Role::Admin, Role::Manager, Role::Finance])]
    #[case(Action::SubmitExpense, EVERY_ROLE)]
    fn permission_table(#[case] action: Action, #[case] allowed: &[Role]) {
        for role in EVERY_ROLE {
            assert_eq!(
                role.permits(action),
                allowed.contains(role),
                "{role} / {action:?}"
            );
        }
    }

    #[rstest]
    #[case(Role::Admin, EVERY_ROLE)]
    #[case(Role::Manager, &[Role::Manager, Role::ProjectManager, Role::Member])]
    #[case(Role::ProjectManager, &[Role::ProjectManager, Role::Member])]
    #[case(Role::Finance, &[Role::Finance, Role::Member])]
    #[case(Role::Member, &[Role::Member])]
    fn grantable_roles(#[case] grantor: Role, #[case] grantable: &[Role]) {
        for role in EVERY_ROLE {
            assert_eq!(
                grantor.may_grant(*role),
                grantable.contains(role),
                "{grantor} granting {role}"
            );
        }
    }

    #[rstest]
    fn roles_round_trip_through_strings() {
        for role in EVERY_ROLE {
            assert_eq!(role.as_str().parse::<Role>(), Ok(*role));
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[rstest]
    fn role_serialises_snake_case() {
        let value = serde_json::to_value(Role::ProjectManager).expect("serialises");
        assert_eq!(value, serde_json::json!("project_manager"));
    }
}
