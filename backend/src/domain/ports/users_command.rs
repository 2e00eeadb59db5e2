//! Driving port for user lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, RequestContext, User, UserId, UserUpdate};

/// Domain use-case port for registering, updating, and deleting users.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Hash the password and persist a new user.
    async fn register(&self, ctx: &RequestContext, user: NewUser) -> Result<User, Error>;

    /// Apply a partial update; a no-op update is rejected.
    async fn update_user(&self, ctx: &RequestContext, update: UserUpdate) -> Result<User, Error>;

    /// Delete an existing user.
    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> Result<(), Error>;
}
