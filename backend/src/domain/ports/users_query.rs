//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user records
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, PageRequest, RequestContext, User, UserId};

/// Domain use-case port for reading users.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a single user.
    async fn get_user(&self, ctx: &RequestContext, id: UserId) -> Result<User, Error>;

    /// Return one page of users ordered by identifier.
    async fn list_users(&self, ctx: &RequestContext, page: PageRequest)
    -> Result<Vec<User>, Error>;
}
