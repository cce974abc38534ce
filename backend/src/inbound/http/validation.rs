//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose `details` name the
//! offending field and a stable machine-readable code.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, MoneyValidationError, RecordIdError, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidId,
    InvalidDate,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const ORGANIZATION_ID: FieldName = FieldName::new("organizationId");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");
pub(crate) const ID: FieldName = FieldName::new("id");
pub(crate) const AMOUNT_CENTS: FieldName = FieldName::new("amountCents");
pub(crate) const CURRENCY: FieldName = FieldName::new("currency");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// Report a domain validation failure against `field`.
pub(crate) fn invalid_value_error(field: FieldName, reason: impl Display) -> Error {
    ValidationError::new(field, reason.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be a valid UUID"))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

/// Parse a serial identifier, accepting only positive 32-bit integers.
pub(crate) fn parse_record_id<T>(
    value: &str,
    field: FieldName,
    parse: fn(&str) -> Result<T, RecordIdError>,
) -> Result<T, Error> {
    parse(value).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be a positive 32-bit integer"))
            .with_value(ErrorCode::InvalidId, value)
    })
}

/// Validate a serial identifier supplied as a JSON number.
pub(crate) fn record_id_from_number<T>(
    value: i64,
    field: FieldName,
    new: fn(i32) -> Result<T, RecordIdError>,
) -> Result<T, Error> {
    i32::try_from(value)
        .map_err(|_| RecordIdError(value))
        .and_then(new)
        .map_err(|_| {
            let name = field.as_str();
            ValidationError::new(field, format!("{name} must be a positive 32-bit integer"))
                .with_value(ErrorCode::InvalidId, value.to_string())
        })
}

/// Report an amount or currency failure against the matching body field.
pub(crate) fn money_error(err: &MoneyValidationError) -> Error {
    let field = match err {
        MoneyValidationError::NonPositiveAmount(_) | MoneyValidationError::AmountTooLarge(_) => {
            AMOUNT_CENTS
        }
        MoneyValidationError::InvalidCurrency(_) => CURRENCY,
    };
    invalid_value_error(field, err)
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be a YYYY-MM-DD date"))
            .with_value(ErrorCode::InvalidDate, value)
    })
}

/// Parse an optional status filter using the domain's wire names.
pub(crate) fn parse_optional_status<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                let name = field.as_str();
                ValidationError::new(field, format!("unknown {name}: {raw}"))
                    .with_value(ErrorCode::InvalidValue, raw)
            })
        })
        .transpose()
}

/// Check a legacy `userId` query parameter against the session user.
///
/// The parameter never selects the acting identity; a value naming anyone
/// other than the signed-in user is `forbidden`.
pub(crate) fn ensure_session_user(
    claimed: Option<&str>,
    session_user: &UserId,
) -> Result<(), Error> {
    let Some(raw) = claimed else {
        return Ok(());
    };
    let claimed = parse_uuid(raw, USER_ID)?;
    if &claimed == session_user.as_uuid() {
        Ok(())
    } else {
        Err(
            Error::forbidden("userId does not match the signed-in user").with_details(json!({
                "field": USER_ID.as_str(),
                "code": "user_mismatch",
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, ExpenseId, ExpenseStatus};
    use rstest::rstest;

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-4", None)]
    #[case("2147483648", None)]
    #[case("abc", None)]
    fn record_ids_must_be_positive_i32(#[case] raw: &str, #[case] expected: Option<i32>) {
        let parsed = parse_record_id(raw, ID, ExpenseId::parse);
        assert_eq!(parsed.as_ref().ok().map(|id| id.get()), expected);
        if let Err(err) = parsed {
            assert_eq!(err.code(), DomainCode::InvalidRequest);
            assert_eq!(err.details().and_then(|d| d.get("code")), Some(&json!("invalid_id")));
        }
    }

    #[rstest]
    #[case(3, Some(3))]
    #[case(0, None)]
    #[case(i64::from(i32::MAX) + 1, None)]
    fn numeric_record_ids_are_bounded(#[case] raw: i64, #[case] expected: Option<i32>) {
        let parsed = record_id_from_number(raw, FieldName::new("projectId"), ExpenseId::new);
        assert_eq!(parsed.ok().map(ExpenseId::get), expected);
    }

    #[rstest]
    fn money_errors_name_their_field() {
        let err = money_error(&MoneyValidationError::InvalidCurrency("EU".to_owned()));
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("currency")));
        let err = money_error(&MoneyValidationError::NonPositiveAmount(0));
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("amountCents")));
        let err = money_error(&MoneyValidationError::AmountTooLarge(i64::MAX));
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("amountCents")));
    }

    #[rstest]
    fn malformed_uuid_reports_field_and_value() {
        let err = parse_uuid("nope", ORGANIZATION_ID).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "organizationId", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn dates_use_calendar_format() {
        let field = FieldName::new("incurredOn");
        assert_eq!(
            parse_date("2026-02-28", field).ok(),
            NaiveDate::from_ymd_opt(2026, 2, 28)
        );
        assert!(parse_date("2026-02-30", field).is_err());
        assert!(parse_date("28/02/2026", field).is_err());
    }

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some(""), Ok(None))]
    #[case(Some("approved"), Ok(Some(ExpenseStatus::Approved)))]
    #[case(Some("archived"), Err(DomainCode::InvalidRequest))]
    fn status_filters_parse_wire_names(
        #[case] raw: Option<&str>,
        #[case] expected: Result<Option<ExpenseStatus>, DomainCode>,
    ) {
        let parsed = parse_optional_status::<ExpenseStatus>(raw, FieldName::new("status"))
            .map_err(|err| err.code());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn session_user_check() {
        let user = UserId::random();
        let own = user.to_string();
        let other = UserId::random().to_string();

        assert!(ensure_session_user(None, &user).is_ok());
        assert!(ensure_session_user(Some(own.as_str()), &user).is_ok());
        assert_eq!(
            ensure_session_user(Some(other.as_str()), &user).map_err(|err| err.code()),
            Err(DomainCode::Forbidden)
        );
        assert_eq!(
            ensure_session_user(Some("bogus"), &user).map_err(|err| err.code()),
            Err(DomainCode::InvalidRequest)
        );
    }
}
