//! Tests for the domain user model.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_round_trips_through_json() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let value = serde_json::to_value(&id).expect("serialize");
    assert_eq!(value, json!(VALID_ID));
    let back: UserId = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, id);
}

#[rstest]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("bad name", UserValidationError::UsernameInvalidCharacters)]
#[case("bad$name", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_rejects_overlong_input() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
#[case("ada_l")]
#[case("Grace123")]
fn username_accepts_valid_handles(#[case] raw: &str) {
    assert_eq!(Username::new(raw).expect("valid").as_ref(), raw);
}

#[rstest]
#[case("no-at-sign")]
#[case("@example.com")]
#[case("ada@")]
#[case("a@b@c")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(Email::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn email_is_normalized_to_lowercase() {
    let email = Email::new("  Ada@Example.COM ").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("USER", Role::User)]
#[case("ADMIN", Role::Admin)]
fn role_parses_database_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>(), Ok(expected));
    assert_eq!(expected.as_str(), raw);
}

#[rstest]
fn role_rejects_unknown_values() {
    assert_eq!(
        "root".parse::<Role>(),
        Err(UserValidationError::UnknownRole("root".to_owned()))
    );
}

#[rstest]
fn account_changes_report_emptiness() {
    assert!(AccountChanges::default().is_empty());
    let changes = AccountChanges {
        username: Some(Username::new("ada_l").expect("valid")),
        email: None,
    };
    assert!(!changes.is_empty());
}
