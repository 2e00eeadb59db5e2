//! Port for one-way password hashing.

use crate::domain::{Error, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Salt generation or another resource failed while hashing.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        Error::internal(value)
    }
}

/// Turns plaintext credentials into self-salting hashes and checks candidates.
///
/// Implementations must be randomised (two hashes of the same input differ)
/// and compare in constant time.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `plaintext` against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparsable hash is an error.
    fn verify(&self, hash: &PasswordHash, plaintext: &str) -> Result<bool, PasswordHashError>;
}
