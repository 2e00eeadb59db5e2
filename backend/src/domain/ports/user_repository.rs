//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters translate every storage-specific failure into exactly one
//! [`UserPersistenceError`] variant; services convert those into domain
//! [`Error`]s without further reclassification.

use std::future::Future;

use async_trait::async_trait;

use crate::domain::{ContextError, Error, PageRequest, RequestContext, User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No row matches the requested key.
        NotFound { message: String } => "user not found: {message}",
        /// A uniqueness constraint (email) was violated.
        Conflict { message: String } => "user already exists: {message}",
        /// The request context was cancelled or its deadline elapsed.
        Cancelled => "user repository call cancelled",
        /// Any other storage fault.
        Internal { message: String } => "user repository failure: {message}",
    }
}

impl From<ContextError> for UserPersistenceError {
    fn from(_: ContextError) -> Self {
        Self::Cancelled
    }
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::NotFound { message } => {
                Error::not_found(format!("user not found: {message}"))
            }
            UserPersistenceError::Conflict { .. } => {
                Error::conflict("a user with this email already exists")
            }
            UserPersistenceError::Cancelled => Error::cancelled("request was cancelled"),
            UserPersistenceError::Internal { message } => {
                Error::internal(format!("user repository failure: {message}"))
            }
        }
    }
}

/// Await a repository call under `ctx` and convert its outcome into a domain
/// result.
pub(crate) async fn within_context<T, F>(ctx: &RequestContext, call: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, UserPersistenceError>>,
{
    ctx.run(call)
        .await
        .map_err(UserPersistenceError::from)
        .and_then(|outcome| outcome)
        .map_err(Error::from)
}

/// Storage contract for user records.
///
/// Every call receives the request context and must stop promptly with
/// [`UserPersistenceError::Cancelled`] once it is cancelled or past its
/// deadline. Calls are never retried by the core.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned identifier.
    ///
    /// Fails with [`UserPersistenceError::Conflict`] when the email is taken;
    /// nothing is written in that case.
    async fn create_user(
        &self,
        ctx: &RequestContext,
        draft: &UserDraft,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn get_user_by_id(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by (normalised) email.
    async fn get_user_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<User, UserPersistenceError>;

    /// List users ordered by identifier ascending.
    async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite name, email, and password hash of an existing user.
    async fn update_user(
        &self,
        ctx: &RequestContext,
        user: &User,
    ) -> Result<User, UserPersistenceError>;

    /// Remove a user by identifier.
    async fn delete_user(&self, ctx: &RequestContext, id: UserId)
    -> Result<(), UserPersistenceError>;
}
