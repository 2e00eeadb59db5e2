//! Domain primitives, ports, and services.
//!
//! Purpose: Define strongly typed user and token types plus the services that
//! enforce registration, update, and login policy. Nothing here knows about
//! storage engines, transports, or key management; those arrive through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure with a code.
//! - User, NewUser, UserUpdate: user records and validated inputs.
//! - LoginCredentials, AccessToken, TokenPayload: authentication values.
//! - RequestContext: cancellation and deadline propagation.
//! - UserService, AuthService: driving port implementations.

pub mod auth;
pub mod auth_service;
pub mod context;
pub mod error;
pub mod ports;
pub mod user;
pub mod user_service;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError, TokenId, TokenPayload};
pub use self::auth_service::AuthService;
pub use self::context::{ContextError, RequestContext};
pub use self::error::{AuthFailure, Error, ErrorCode, INTERNAL_ERROR_MESSAGE};
pub use self::user::{
    Email, NewUser, PageRequest, Password, PasswordHash, User, UserDraft, UserId, UserName,
    UserUpdate, UserValidationError,
};
pub use self::user_service::{NOTHING_TO_UPDATE, UserService};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use identity::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("no such user"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
