//! Port for issuing and verifying stateless bearer tokens.
//!
//! Tokens are self-contained: verification needs only the token and the
//! server-held key, so there is no revocation list and a leaked token stays
//! valid until it expires.

use crate::domain::{AccessToken, AuthFailure, Error, TokenPayload, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token service adapters.
    pub enum TokenError {
        /// Malformed, tampered, or sealed under another key.
        Invalid => "token is invalid",
        /// Authentic but past its expiry.
        Expired => "token has expired",
        /// Encryption or serialisation failed while issuing.
        Internal { message: String } => "token service failure: {message}",
    }
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Invalid => Error::unauthorized(AuthFailure::InvalidToken),
            TokenError::Expired => Error::unauthorized(AuthFailure::ExpiredToken),
            TokenError::Internal { message } => Error::internal(message),
        }
    }
}

/// Issues tokens for authenticated users and verifies presented ones.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a fresh token whose subject is `user`'s identifier.
    fn create_token(&self, user: &User) -> Result<AccessToken, TokenError>;

    /// Authenticate and decode a presented token.
    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(TokenError::invalid(), AuthFailure::InvalidToken)]
    #[case(TokenError::expired(), AuthFailure::ExpiredToken)]
    fn verification_failures_are_unauthorized(
        #[case] error: TokenError,
        #[case] expected: AuthFailure,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), ErrorCode::Unauthorized);
        assert_eq!(mapped.auth_failure(), Some(expected));
    }

    #[rstest]
    fn issuing_failures_are_internal() {
        let mapped = Error::from(TokenError::internal("aead failure"));
        assert_eq!(mapped.code(), ErrorCode::InternalError);
    }
}
