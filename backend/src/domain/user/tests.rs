//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn stored_user() -> User {
    User::new(
        UserId::new(7),
        UserName::new("Alice").expect("valid name"),
        Email::new("alice@example.com").expect("valid email"),
        PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA").expect("valid hash"),
    )
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn blank_names_are_rejected(#[case] name: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(name).expect_err("blank name"), expected);
}

#[rstest]
fn long_names_are_rejected() {
    let err = UserName::new("a".repeat(NAME_MAX + 1)).expect_err("too long");
    assert_eq!(err, UserValidationError::NameTooLong { max: NAME_MAX });
}

#[rstest]
fn names_are_trimmed() {
    let name = UserName::new("  Ada Lovelace ").expect("valid name");
    assert_eq!(name.as_ref(), "Ada Lovelace");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("alice@localhost", UserValidationError::InvalidEmail)]
#[case("a b@example.com", UserValidationError::InvalidEmail)]
fn malformed_emails_are_rejected(#[case] email: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(email).expect_err("invalid email"), expected);
}

#[rstest]
fn emails_are_normalised() {
    let email = Email::new(" Alice@Example.COM ").expect("valid email");
    assert_eq!(email.as_ref(), "alice@example.com");
}

#[rstest]
fn short_passwords_are_rejected() {
    let err = Password::new("short").expect_err("too short");
    assert_eq!(err, UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
}

#[rstest]
fn secrets_are_redacted_in_debug_output() {
    let password = Password::new("pw123456").expect("valid password");
    let hash = PasswordHash::new("$argon2id$secret").expect("valid hash");
    assert!(!format!("{password:?}").contains("pw123456"));
    assert!(!format!("{hash:?}").contains("secret"));
}

#[rstest]
fn serialised_user_omits_password_hash(stored_user: User) {
    let value = serde_json::to_value(&stored_user).expect("serialise user");
    assert_eq!(value["id"], 7);
    assert_eq!(value["email"], "alice@example.com");
    assert!(value.get("passwordHash").is_none());
}

#[rstest]
fn update_treats_empty_strings_as_absent() {
    let update = UserUpdate::try_from_parts(UserId::new(7), "", " ", "").expect("valid update");
    assert!(update.name().is_none());
    assert!(update.email().is_none());
    assert!(update.password().is_none());
}

#[rstest]
#[case("", "", "", false)]
#[case("Alice", "alice@example.com", "", false)]
#[case("Alice", "", "", false)]
#[case("Bob", "alice@example.com", "", true)]
#[case("Alice", "bob@example.com", "", true)]
#[case("Alice", "alice@example.com", "new-password", false)]
#[case("", "", "new-password", true)]
#[case("Alice", "", "new-password", true)]
#[case("Bob", "alice@example.com", "new-password", true)]
fn update_change_detection(
    stored_user: User,
    #[case] name: &str,
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: bool,
) {
    let update =
        UserUpdate::try_from_parts(stored_user.id(), name, email, password).expect("valid update");
    assert_eq!(update.changes(&stored_user), expected);
}

#[rstest]
fn update_validates_supplied_fields() {
    let err = UserUpdate::try_from_parts(UserId::new(1), "", "nope", "").expect_err("bad email");
    assert_eq!(err, UserValidationError::InvalidEmail);
}

#[rstest]
fn validation_errors_map_to_invalid_request() {
    let err: Error = UserValidationError::EmptyName.into();
    assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "name must not be empty");
}

#[rstest]
#[case(0, true)]
#[case(1, false)]
fn zero_limit_pages_are_empty(#[case] limit: u32, #[case] expected: bool) {
    assert_eq!(PageRequest::new(0, limit).is_empty(), expected);
}
