//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! exchange credentials for a bearer token without knowing (or importing) the
//! backing infrastructure. Handler tests substitute a double instead of wiring
//! persistence and key material.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, RequestContext};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a token for the matching user.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// [`crate::domain::AuthFailure::InvalidCredentials`].
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: &LoginCredentials,
    ) -> Result<AccessToken, Error>;
}
