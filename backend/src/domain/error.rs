//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope; the services in this
//! crate only ever raise one of the [`ErrorCode`] categories below.

use serde::{Deserialize, Serialize};
use tracing::error;

/// Message exposed for every [`ErrorCode::InternalError`].
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed, insufficient, or a no-op.
    InvalidRequest,
    /// Authentication failed: bad credentials or an unusable token.
    Unauthorized,
    /// The requested user does not exist.
    NotFound,
    /// The request collides with existing state (duplicate email).
    Conflict,
    /// The caller cancelled the request or its deadline elapsed.
    Cancelled,
    /// Hashing, storage, or other infrastructure fault.
    InternalError,
}

/// Reason attached to [`ErrorCode::Unauthorized`] errors.
///
/// Token failures are only classified as [`AuthFailure::ExpiredToken`] once
/// the token has been authenticated, so a forged token is always reported as
/// [`AuthFailure::InvalidToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    /// Unknown email or wrong password; deliberately indistinguishable.
    InvalidCredentials,
    /// Token is malformed, tampered, or sealed under a different key.
    InvalidToken,
    /// Token authenticated correctly but its expiry has passed.
    ExpiredToken,
}

impl AuthFailure {
    fn message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid email or password",
            Self::InvalidToken => "token is invalid",
            Self::ExpiredToken => "token has expired",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty.
/// - `auth_failure` is present exactly when `code` is
///   [`ErrorCode::Unauthorized`].
///
/// # Examples
/// ```
/// use identity::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("user 7 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_failure: Option<AuthFailure>,
}

impl Error {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            fallback_message(code).to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            auth_failure: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message safe to return to callers.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Authentication sub-kind for [`ErrorCode::Unauthorized`] errors.
    pub fn auth_failure(&self) -> Option<AuthFailure> {
        self.auth_failure
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(reason: AuthFailure) -> Self {
        Self {
            auth_failure: Some(reason),
            ..Self::new(ErrorCode::Unauthorized, reason.message())
        }
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::Cancelled`].
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    ///
    /// The detail is logged and then discarded; callers only ever see
    /// [`INTERNAL_ERROR_MESSAGE`].
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "internal error");
        Self::new(ErrorCode::InternalError, INTERNAL_ERROR_MESSAGE)
    }

    /// Whether this error is an authentication failure of the given kind.
    pub fn is_auth_failure(&self, reason: AuthFailure) -> bool {
        self.auth_failure == Some(reason)
    }
}

fn fallback_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidRequest => "invalid request",
        ErrorCode::Unauthorized => "unauthorized",
        ErrorCode::NotFound => "not found",
        ErrorCode::Conflict => "conflict",
        ErrorCode::Cancelled => "request cancelled",
        ErrorCode::InternalError => INTERNAL_ERROR_MESSAGE,
    }
}
