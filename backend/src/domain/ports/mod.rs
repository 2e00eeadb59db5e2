//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserRepository`], [`PasswordHasher`], [`TokenService`]) are
//! implemented by outbound adapters. Driving ports ([`UsersCommand`],
//! [`UsersQuery`], [`LoginService`]) are implemented by the domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub(crate) use user_repository::within_context;
pub use users_command::UsersCommand;
pub use users_query::UsersQuery;
