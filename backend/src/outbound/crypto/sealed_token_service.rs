//! AES-256-GCM adapter for the [`TokenService`] port.
//!
//! Tokens are encrypted *and* authenticated rather than merely signed, so the
//! payload is unreadable without the key and there is no algorithm header for
//! a client to tamper with.
//!
//! Wire format: `v1.local.` followed by unpadded base64url of
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`. The version header is
//! bound into the tag as associated data.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mockable::Clock;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, TokenId, TokenPayload, User, UserId};

/// Version and purpose prefix of every token.
pub const TOKEN_HEADER: &str = "v1.local.";
/// Required symmetric key length in bytes.
pub const TOKEN_KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Errors raised while constructing the token service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenConfigError {
    /// Key material has the wrong length.
    #[error("token key must be exactly {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },
    /// TTL is zero or does not fit a timestamp offset.
    #[error("token ttl must be positive and representable, got {ttl:?}")]
    InvalidTtl { ttl: Duration },
}

/// Fixed-length symmetric key; zeroed on drop and never printed.
#[derive(Clone)]
pub struct TokenKey(Zeroizing<[u8; TOKEN_KEY_LEN]>);

impl TokenKey {
    /// Copy key material, rejecting anything that is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TokenConfigError> {
        let key: [u8; TOKEN_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| TokenConfigError::KeyLength {
                    expected: TOKEN_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(Zeroizing::new(key)))
    }

    /// Generate a random key from the operating system RNG.
    pub fn generate() -> Self {
        let generated = Aes256Gcm::generate_key(&mut OsRng);
        let mut key = [0_u8; TOKEN_KEY_LEN];
        key.copy_from_slice(generated.as_slice());
        Self(Zeroizing::new(key))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(<redacted>)")
    }
}

/// Token service sealing payloads with AES-256-GCM.
///
/// Holds no mutable state, so one instance can be shared across tasks.
#[derive(Clone)]
pub struct SealedTokenService {
    cipher: Aes256Gcm,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl SealedTokenService {
    /// Build a service issuing tokens valid for `ttl`.
    pub fn new(
        key: &TokenKey,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenConfigError> {
        let ttl = chrono::Duration::from_std(ttl)
            .ok()
            .filter(|value| *value > chrono::Duration::zero())
            .ok_or(TokenConfigError::InvalidTtl { ttl })?;
        let cipher =
            Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| TokenConfigError::KeyLength {
                expected: TOKEN_KEY_LEN,
                actual: key.as_bytes().len(),
            })?;
        Ok(Self { cipher, ttl, clock })
    }

    /// Lifetime applied to newly issued tokens.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token for `subject` without a full user record.
    pub fn issue(&self, subject: UserId) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc();
        let payload = TokenPayload {
            token_id: TokenId::random(),
            subject,
            issued_at,
            expired_at: issued_at + self.ttl,
        };
        self.seal(&payload).map(AccessToken::new)
    }

    fn seal(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec(payload)
                .map_err(|err| TokenError::internal(format!("serialise payload: {err}")))?,
        );
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext.as_slice(),
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::internal("token encryption failed"))?;

        let mut body = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        body.extend_from_slice(nonce.as_slice());
        body.extend_from_slice(&ciphertext);
        Ok(format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(body)))
    }

    fn open(&self, token: &str) -> Option<TokenPayload> {
        let encoded = token.strip_prefix(TOKEN_HEADER)?;
        let body = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        if body.len() < NONCE_LEN + TAG_LEN {
            return None;
        }
        let (nonce, ciphertext) = body.split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.cipher
                .decrypt(
                    Nonce::from_slice(nonce),
                    Payload {
                        msg: ciphertext,
                        aad: TOKEN_HEADER.as_bytes(),
                    },
                )
                .ok()?,
        );
        let payload: TokenPayload = serde_json::from_slice(&plaintext).ok()?;
        (payload.expired_at > payload.issued_at).then_some(payload)
    }
}

impl fmt::Debug for SealedTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService for SealedTokenService {
    fn create_token(&self, user: &User) -> Result<AccessToken, TokenError> {
        self.issue(user.id())
    }

    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let Some(payload) = self.open(token) else {
            debug!("rejected unauthenticated token");
            return Err(TokenError::Invalid);
        };
        // Expiry is only consulted once the token is known to be authentic.
        if payload.is_expired_at(self.clock.utc()) {
            debug!(token_id = %payload.token_id, "rejected expired token");
            return Err(TokenError::Expired);
        }
        Ok(payload)
    }
}

#[cfg(test)]
#[path = "sealed_token_service_tests.rs"]
mod tests;
