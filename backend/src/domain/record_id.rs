//! Typed identifiers for database records.
//!
//! Serial records (projects, tasks, expenses, vendor bills) use positive
//! 32-bit integers; invitations and notifications use UUIDs.

use std::fmt;

/// Error raised when an integer identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got {0}")]
pub struct RecordIdError(pub i64);

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Validate a raw identifier.
            pub fn new(raw: i32) -> Result<Self, RecordIdError> {
                if raw > 0 {
                    Ok(Self(raw))
                } else {
                    Err(RecordIdError(i64::from(raw)))
                }
            }

            /// Parse a path segment, accepting only positive 32-bit integers.
            pub fn parse(raw: &str) -> Result<Self, RecordIdError> {
                let value: i64 = raw.trim().parse().map_err(|_| RecordIdError(0))?;
                let value = i32::try_from(value).map_err(|_| RecordIdError(value))?;
                Self::new(value)
            }

            /// Raw database value.
            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i32> for $name {
            type Error = RecordIdError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_record_id!(
    /// Project identifier.
    ProjectId
);
define_record_id!(
    /// Task identifier.
    TaskId
);
define_record_id!(
    /// Expense identifier.
    ExpenseId
);
define_record_id!(
    /// Vendor bill identifier.
    VendorBillId
);
define_uuid_id!(
    /// Invitation identifier.
    InvitationId
);
define_uuid_id!(
    /// Notification identifier.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 42 ", Some(42))]
    #[case("2147483647", Some(i32::MAX))]
    #[case("0", None)]
    #[case("-5", None)]
    #[case("2147483648", None)]
    #[case("abc", None)]
    #[case("1.5", None)]
    fn parse_accepts_positive_i32_only(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(ExpenseId::parse(raw).ok().map(ExpenseId::get), expected);
    }

    #[rstest]
    fn deserialising_rejects_non_positive_ids() {
        assert!(serde_json::from_str::<ProjectId>("0").is_err());
        assert_eq!(
            serde_json::from_str::<ProjectId>("7").expect("valid id").get(),
            7
        );
    }
}
