//! Tests for the domain user primitives.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_round_trips_through_serde() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let value = serde_json::to_value(&id).expect("serialises");
    assert_eq!(value, json!(VALID_ID));
    let back: UserId = serde_json::from_value(value).expect("deserialises");
    assert_eq!(back, id);
}

#[rstest]
fn from_uuid_matches_parsed_form() {
    let uuid = Uuid::parse_str(VALID_ID).expect("uuid");
    assert_eq!(UserId::from_uuid(uuid), UserId::new(VALID_ID).expect("valid id"));
}

#[rstest]
#[case("Ada@Example.com", "ada@example.com")]
#[case("  grace@navy.mil  ", "grace@navy.mil")]
fn email_is_trimmed_and_lower_cased(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
#[case("spaced out@example.com", UserValidationError::InvalidEmail)]
#[case("nodot@localhost", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_rejects_overlong_input() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        EmailAddress::new(raw).expect_err("too long"),
        UserValidationError::EmailTooLong { max: EMAIL_MAX }
    );
}

#[rstest]
fn display_name_bounds() {
    assert_eq!(
        DisplayName::new("  ").expect_err("blank"),
        UserValidationError::EmptyDisplayName
    );
    assert_eq!(
        DisplayName::new("a".repeat(DISPLAY_NAME_MAX + 1)).expect_err("too long"),
        UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        }
    );
    assert_eq!(
        DisplayName::new(" Ada Lovelace ").expect("valid").as_ref(),
        "Ada Lovelace"
    );
}

#[rstest]
fn user_serialises_camel_case() {
    let user = User::new(
        UserId::new(VALID_ID).expect("valid id"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        DisplayName::new("Ada Lovelace").expect("valid name"),
    );
    let value = serde_json::to_value(&user).expect("serialises");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "email": "ada@example.com",
            "displayName": "Ada Lovelace",
        })
    );
}
