//! User lifecycle service.
//!
//! Implements the [`UsersCommand`] and [`UsersQuery`] driving ports on top of
//! the [`UserRepository`] and [`PasswordHasher`] driven ports. Passwords are
//! hashed here, so the repository only ever sees encoded hashes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    PasswordHasher, UserRepository, UsersCommand, UsersQuery, within_context,
};
use crate::domain::{
    Error, NewUser, PageRequest, RequestContext, User, UserDraft, UserId, UserUpdate,
};

/// Message returned when an update would not change the stored record.
pub const NOTHING_TO_UPDATE: &str = "nothing to update";

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<R, H> {
    repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service from its collaborators.
    pub fn new(repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repo, hasher }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn fetch(&self, ctx: &RequestContext, id: UserId) -> Result<User, Error> {
        within_context(ctx, self.repo.get_user_by_id(ctx, id)).await
    }

    fn apply_update(&self, existing: User, update: &UserUpdate) -> Result<User, Error> {
        let mut updated = existing;
        if let Some(name) = update.name() {
            updated = updated.with_name(name.clone());
        }
        if let Some(email) = update.email() {
            updated = updated.with_email(email.clone());
        }
        // An absent password keeps the stored hash.
        if let Some(password) = update.password() {
            let hash = self.hasher.hash(password.expose())?;
            updated = updated.with_password_hash(hash);
        }
        Ok(updated)
    }
}

#[async_trait]
impl<R, H> UsersCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, ctx: &RequestContext, user: NewUser) -> Result<User, Error> {
        let password_hash = self.hasher.hash(user.password().expose())?;
        let draft = UserDraft {
            name: user.name().clone(),
            email: user.email().clone(),
            password_hash,
        };
        let created = within_context(ctx, self.repo.create_user(ctx, &draft)).await?;
        info!(user_id = %created.id(), "registered user");
        Ok(created)
    }

    async fn update_user(&self, ctx: &RequestContext, update: UserUpdate) -> Result<User, Error> {
        let existing = self.fetch(ctx, update.id()).await?;
        if !update.changes(&existing) {
            debug!(user_id = %update.id(), "rejected no-op user update");
            return Err(Error::invalid_request(NOTHING_TO_UPDATE));
        }

        let updated = self.apply_update(existing, &update)?;
        within_context(ctx, self.repo.update_user(ctx, &updated)).await
    }

    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> Result<(), Error> {
        // Existence check first: a missing user never reaches the delete call.
        self.fetch(ctx, id).await?;
        within_context(ctx, self.repo.delete_user(ctx, id)).await?;
        info!(user_id = %id, "deleted user");
        Ok(())
    }
}

#[async_trait]
impl<R, H> UsersQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn get_user(&self, ctx: &RequestContext, id: UserId) -> Result<User, Error> {
        self.fetch(ctx, id).await
    }

    async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<Vec<User>, Error> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        within_context(ctx, self.repo.list_users(ctx, page)).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
