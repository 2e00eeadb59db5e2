//! Outbound adapters implementing domain ports.
//!
//! - **crypto**: Argon2id password hashing and AES-GCM sealed access tokens
//! - **memory**: in-process user repository for tests and local tooling
//!
//! Adapters translate between domain types and library representations. They
//! contain no business logic.

pub mod crypto;
pub mod memory;
