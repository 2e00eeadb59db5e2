//! Operator tooling: hash passwords and issue or inspect access tokens using
//! the same adapters and configuration as the service.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use identity::config::{BuildMode, token_settings_from_env};
use identity::domain::ports::{PasswordHasher, TokenService};
use identity::domain::{Error, UserId};
use identity::outbound::crypto::{Argon2PasswordHasher, SealedTokenService};
use identity::telemetry::init_tracing;
use mockable::{DefaultClock, DefaultEnv};

/// `identity-cli` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "identity-cli",
    about = "Hash passwords and issue or verify access tokens",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print an Argon2id PHC hash of a password.
    HashPassword {
        /// Plaintext password to hash.
        password: String,
    },
    /// Issue a token for a user id using the configured key and TTL.
    IssueToken {
        /// Subject of the token.
        #[arg(long = "user-id", value_name = "id")]
        user_id: i64,
    },
    /// Decrypt a token and print its payload as JSON.
    VerifyToken {
        /// Token to verify.
        token: String,
    },
}

fn main() -> io::Result<()> {
    init_tracing();
    let args = CliArgs::try_parse().map_err(io::Error::other)?;

    match args.command {
        Command::HashPassword { password } => {
            let hasher = Argon2PasswordHasher::new().map_err(to_io)?;
            let hash = hasher.hash(&password).map_err(to_io)?;
            println!("{}", hash.as_str());
        }
        Command::IssueToken { user_id } => {
            let service = token_service()?;
            let token = service.issue(UserId::new(user_id)).map_err(to_io)?;
            println!("{}", token.as_str());
        }
        Command::VerifyToken { token } => {
            let service = token_service()?;
            let payload = service
                .verify_token(&token)
                .map_err(|error| to_io(Error::from(error)))?;
            let rendered = serde_json::to_string_pretty(&payload).map_err(io::Error::other)?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn token_service() -> io::Result<SealedTokenService> {
    let settings = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(to_io)?;
    SealedTokenService::new(&settings.key, settings.ttl, Arc::new(DefaultClock)).map_err(to_io)
}

fn to_io(error: impl std::fmt::Display) -> io::Error {
    io::Error::other(error.to_string())
}
