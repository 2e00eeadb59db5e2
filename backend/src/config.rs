//! Token configuration parsing and validation.
//!
//! Centralises the environment-driven token settings so they are validated
//! consistently and can be tested in isolation.

use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::crypto::{TokenConfigError, TokenKey};

pub(crate) const KEY_ENV: &str = "TOKEN_SYMMETRIC_KEY";
pub(crate) const KEY_FILE_ENV: &str = "TOKEN_SYMMETRIC_KEY_FILE";
pub(crate) const TTL_ENV: &str = "TOKEN_TTL_SECONDS";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of seconds";

/// Token lifetime used when `TOKEN_TTL_SECONDS` is unset.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate ephemeral keys and warn on malformed toggles.
    Debug,
    /// Release builds require an explicit, valid key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use identity::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Settings needed to build a [`crate::outbound::crypto::SealedTokenService`].
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Symmetric key sealing every token.
    pub key: TokenKey,
    /// Lifetime of newly issued tokens.
    pub ttl: Duration,
    /// Whether `key` was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the key file failed.
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key material is unusable.
    #[error(transparent)]
    Key(#[from] TokenConfigError),
    /// Release builds must not use ephemeral keys.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// `TOKEN_SYMMETRIC_KEY` takes precedence over `TOKEN_SYMMETRIC_KEY_FILE`.
///
/// # Examples
///
/// ```rust
/// use identity::config::{token_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TOKEN_SYMMETRIC_KEY" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     "TOKEN_TTL_SECONDS" => Some("60".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl.as_secs(), 60);
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, ConfigError> {
    let ttl = ttl_from_env(env)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let (key, ephemeral) = token_key_from_env(env, allow_ephemeral)?;

    Ok(TokenSettings {
        key,
        ttl,
        ephemeral,
    })
}

fn ttl_from_env<E: Env>(env: &E) -> Result<Duration, ConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(DEFAULT_TOKEN_TTL);
    };
    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(ConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, ConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(ConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(
                value = %value,
                "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled"
            );
            Ok(false)
        }
        None => Err(ConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn token_key_from_env<E: Env>(
    env: &E,
    allow_ephemeral: bool,
) -> Result<(TokenKey, bool), ConfigError> {
    if let Some(raw) = env.string(KEY_ENV) {
        let raw = Zeroizing::new(raw);
        return Ok((TokenKey::from_slice(raw.as_bytes())?, false));
    }

    if let Some(key_path) = env.string(KEY_FILE_ENV) {
        let path = PathBuf::from(key_path);
        let bytes = std::fs::read(&path)
            .map(Zeroizing::new)
            .map_err(|source| ConfigError::KeyRead { path, source })?;
        return Ok((TokenKey::from_slice(&bytes)?, false));
    }

    if allow_ephemeral {
        warn!("using temporary token key (dev only); tokens will not survive a restart");
        return Ok((TokenKey::generate(), true));
    }

    Err(ConfigError::MissingEnv { name: KEY_ENV })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
