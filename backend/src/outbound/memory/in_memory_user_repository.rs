//! In-process [`UserRepository`] adapter.
//!
//! Stores users in a `BTreeMap` keyed by id so listing is naturally ordered.
//! Intended for tests and local tooling; production deployments plug in a
//! database adapter that honours the same error contract.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PageRequest, RequestContext, User, UserDraft, UserId};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    last_id: i64,
}

impl Table {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|row| row.email() == email && Some(row.id()) != except)
    }
}

/// Thread-safe in-memory user store with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.lock().map(|table| table.rows.len()).unwrap_or_default()
    }

    /// Whether the repository holds no users.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::internal("user table lock poisoned"))
    }

    fn lock_for(
        &self,
        ctx: &RequestContext,
    ) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        ctx.check()?;
        self.lock()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        ctx: &RequestContext,
        draft: &UserDraft,
    ) -> Result<User, UserPersistenceError> {
        let mut table = self.lock_for(ctx)?;
        if table.email_taken(&draft.email, None) {
            return Err(UserPersistenceError::conflict(format!(
                "email {} already registered",
                draft.email
            )));
        }
        table.last_id += 1;
        let user = User::new(
            UserId::new(table.last_id),
            draft.name.clone(),
            draft.email.clone(),
            draft.password_hash.clone(),
        );
        table.rows.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn get_user_by_id(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<User, UserPersistenceError> {
        let table = self.lock_for(ctx)?;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found(format!("id {id}")))
    }

    async fn get_user_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<User, UserPersistenceError> {
        let table = self.lock_for(ctx)?;
        table
            .rows
            .values()
            .find(|row| row.email().as_ref() == email)
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found("no user with that email"))
    }

    async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let table = self.lock_for(ctx)?;
        Ok(table
            .rows
            .values()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        user: &User,
    ) -> Result<User, UserPersistenceError> {
        let mut table = self.lock_for(ctx)?;
        if !table.rows.contains_key(&user.id()) {
            return Err(UserPersistenceError::not_found(format!("id {}", user.id())));
        }
        if table.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::conflict(format!(
                "email {} already registered",
                user.email()
            )));
        }
        table.rows.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete_user(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<(), UserPersistenceError> {
        let mut table = self.lock_for(ctx)?;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::not_found(format!("id {id}")))
    }
}
