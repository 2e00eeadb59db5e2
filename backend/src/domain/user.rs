//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Error;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
    PasswordTooShort { min: usize },
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Error::invalid_request(value.to_string())
    }
}

/// Maximum allowed length for a user name.
pub const NAME_MAX: usize = 64;
/// Minimum allowed length for a plaintext password.
pub const PASSWORD_MIN: usize = 8;

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier issued by the storage adapter.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised (trimmed, lowercase) email address.
///
/// Uniqueness is enforced by the storage adapter, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Self-describing password hash (PHC string). Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Encoded hash string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Plaintext password supplied by a caller; wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate the minimum length of a new password.
    pub fn new(plaintext: &str) -> Result<Self, UserValidationError> {
        if plaintext.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(plaintext.to_owned())))
    }

    /// Plaintext value, to be handed straight to the hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `password_hash` is always an encoded hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    #[serde(skip)]
    password_hash: PasswordHash,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, name: UserName, email: Email, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// Storage-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub(crate) fn with_name(mut self, name: UserName) -> Self {
        self.name = name;
        self
    }

    pub(crate) fn with_email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    pub(crate) fn with_password_hash(mut self, password_hash: PasswordHash) -> Self {
        self.password_hash = password_hash;
        self
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    email: Email,
    password: Password,
}

impl NewUser {
    /// Validate registration fields.
    ///
    /// # Examples
    /// ```
    /// use identity::domain::NewUser;
    ///
    /// let user = NewUser::try_from_parts("Alice", "Alice@Example.com", "pw123456").unwrap();
    /// assert_eq!(user.email().as_ref(), "alice@example.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Requested display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Requested email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Row handed to [`crate::domain::ports::UserRepository::create_user`]: a new
/// user whose password has already been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: UserName,
    pub email: Email,
    pub password_hash: PasswordHash,
}

/// Partial update for an existing user.
///
/// `None` fields keep the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    id: UserId,
    name: Option<UserName>,
    email: Option<Email>,
    password: Option<Password>,
}

impl UserUpdate {
    /// Build an update from raw inputs where an empty string means
    /// "not supplied".
    pub fn try_from_parts(
        id: UserId,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let name = (!name.trim().is_empty()).then(|| UserName::new(name)).transpose()?;
        let email = (!email.trim().is_empty()).then(|| Email::new(email)).transpose()?;
        let password = (!password.is_empty())
            .then(|| Password::new(password))
            .transpose()?;
        Ok(Self {
            id,
            name,
            email,
            password,
        })
    }

    /// Identifier of the user being updated.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Replacement name, if any.
    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }

    /// Replacement email, if any.
    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    /// Replacement password, if any.
    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    /// Whether applying this update to `existing` would change anything.
    ///
    /// Supplying both name and email equal to the stored values is a no-op
    /// even when a password accompanies them. Otherwise a supplied password
    /// counts as a change.
    pub fn changes(&self, existing: &User) -> bool {
        let same_name = self.name.as_ref().is_some_and(|name| name == existing.name());
        let same_email = self
            .email
            .as_ref()
            .is_some_and(|email| email == existing.email());
        if same_name && same_email {
            return false;
        }
        let name_changed = self.name.as_ref().is_some_and(|name| name != existing.name());
        let email_changed = self
            .email
            .as_ref()
            .is_some_and(|email| email != existing.email());
        name_changed || email_changed || self.password.is_some()
    }
}

/// Offset pagination window for listing users ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build a page window.
    pub const fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// Whether the window can never contain a row.
    pub const fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

#[cfg(test)]
mod tests;
