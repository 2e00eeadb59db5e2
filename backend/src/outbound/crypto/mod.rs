//! Cryptographic adapters for the password hashing and token ports.

mod argon2_password_hasher;
mod sealed_token_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use sealed_token_service::{
    SealedTokenService, TOKEN_HEADER, TOKEN_KEY_LEN, TokenConfigError, TokenKey,
};
