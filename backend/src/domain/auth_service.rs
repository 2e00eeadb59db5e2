//! Login service.
//!
//! Exchanges credentials for a stateless bearer token. No server-side session
//! is created; logging out is the client discarding its token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    LoginService, PasswordHasher, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, AuthFailure, Error, LoginCredentials, PasswordHash, RequestContext,
};

/// Well-formed Argon2id PHC string with the default cost parameters. Unknown
/// emails are verified against it so they cost as much as a wrong password.
pub(crate) const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$\
    c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication service implementing [`LoginService`].
#[derive(Clone)]
pub struct AuthService<R, T, H> {
    repo: Arc<R>,
    tokens: Arc<T>,
    hasher: Arc<H>,
}

impl<R, T, H> AuthService<R, T, H> {
    /// Create a new service from its collaborators.
    pub fn new(repo: Arc<R>, tokens: Arc<T>, hasher: Arc<H>) -> Self {
        Self {
            repo,
            tokens,
            hasher,
        }
    }
}

impl<R, T, H> AuthService<R, T, H>
where
    H: PasswordHasher,
{
    fn burn_verification(&self, password: &str) {
        let Ok(dummy) = PasswordHash::new(DUMMY_PASSWORD_HASH) else {
            return;
        };
        if let Err(err) = self.hasher.verify(&dummy, password) {
            debug!(error = %err, "dummy password verification failed");
        }
    }
}

#[async_trait]
impl<R, T, H> LoginService for AuthService<R, T, H>
where
    R: UserRepository,
    T: TokenService,
    H: PasswordHasher,
{
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: &LoginCredentials,
    ) -> Result<AccessToken, Error> {
        let lookup = ctx
            .run(self.repo.get_user_by_email(ctx, credentials.email()))
            .await
            .map_err(UserPersistenceError::from)
            .and_then(|outcome| outcome);

        let user = match lookup {
            Ok(user) => user,
            // Unknown accounts look exactly like wrong passwords.
            Err(UserPersistenceError::NotFound { .. }) => {
                self.burn_verification(credentials.password());
                warn!("login failed: invalid credentials");
                return Err(Error::unauthorized(AuthFailure::InvalidCredentials));
            }
            Err(other) => return Err(other.into()),
        };

        if !self
            .hasher
            .verify(user.password_hash(), credentials.password())?
        {
            warn!(user_id = %user.id(), "login failed: invalid credentials");
            return Err(Error::unauthorized(AuthFailure::InvalidCredentials));
        }

        let token = self.tokens.create_token(&user)?;
        info!(user_id = %user.id(), "issued access token");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockPasswordHasher, MockTokenService, MockUserRepository, PasswordHashError, TokenError,
    };
    use crate::domain::{Email, ErrorCode, PasswordHash, User, UserId, UserName};
    use rstest::{fixture, rstest};

    const STORED_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$stored$hash";

    fn stored_user() -> User {
        User::new(
            UserId::new(3),
            UserName::new("Alice").expect("valid name"),
            Email::new("alice@example.com").expect("valid email"),
            PasswordHash::new(STORED_HASH).expect("valid hash"),
        )
    }

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("alice@example.com", "pw123456").expect("valid")
    }

    fn make_service(
        repo: MockUserRepository,
        tokens: MockTokenService,
        hasher: MockPasswordHasher,
    ) -> AuthService<MockUserRepository, MockTokenService, MockPasswordHasher> {
        AuthService::new(Arc::new(repo), Arc::new(tokens), Arc::new(hasher))
    }

    fn repo_finding(user: Option<User>) -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email()
            .withf(|_, email: &str| email == "alice@example.com")
            .times(1)
            .return_once(move |_, email| {
                user.ok_or_else(|| UserPersistenceError::not_found(email.to_owned()))
            });
        repo
    }

    fn hasher_answering(matches: bool) -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|hash: &PasswordHash, plaintext: &str| {
                hash.as_str() == STORED_HASH && plaintext == "pw123456"
            })
            .times(1)
            .returning(move |_, _| Ok(matches));
        hasher
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_token_for_valid_credentials(credentials: LoginCredentials) {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_create_token()
            .withf(|user: &User| user.id() == UserId::new(3))
            .times(1)
            .returning(|_| Ok(AccessToken::new("v1.local.token")));

        let service = make_service(
            repo_finding(Some(stored_user())),
            tokens,
            hasher_answering(true),
        );
        let token = service
            .login(&RequestContext::background(), &credentials)
            .await
            .expect("login succeeds");

        assert_eq!(token.as_str(), "v1.local.token");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_identically(credentials: LoginCredentials) {
        let ctx = RequestContext::background();

        let mut no_tokens = MockTokenService::new();
        no_tokens.expect_create_token().times(0);
        let mut dummy_hasher = MockPasswordHasher::new();
        dummy_hasher
            .expect_verify()
            .withf(|hash: &PasswordHash, plaintext: &str| {
                hash.as_str() == DUMMY_PASSWORD_HASH && plaintext == "pw123456"
            })
            .times(1)
            .returning(|_, _| Ok(false));
        let unknown = make_service(repo_finding(None), no_tokens, dummy_hasher)
            .login(&ctx, &credentials)
            .await
            .expect_err("unknown email");

        let mut no_tokens = MockTokenService::new();
        no_tokens.expect_create_token().times(0);
        let wrong = make_service(
            repo_finding(Some(stored_user())),
            no_tokens,
            hasher_answering(false),
        )
        .login(&ctx, &credentials)
        .await
        .expect_err("wrong password");

        assert_eq!(unknown, wrong);
        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown.auth_failure(), Some(AuthFailure::InvalidCredentials));
    }

    #[rstest]
    #[tokio::test]
    async fn storage_faults_are_not_disguised_as_bad_credentials(credentials: LoginCredentials) {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email()
            .times(1)
            .return_once(|_, _| Err(UserPersistenceError::internal("connection reset")));

        let service = make_service(repo, MockTokenService::new(), MockPasswordHasher::new());
        let err = service
            .login(&RequestContext::background(), &credentials)
            .await
            .expect_err("storage fault");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_stored_hash_is_internal(credentials: LoginCredentials) {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .times(1)
            .returning(|_, _| Err(PasswordHashError::malformed_hash("bad PHC string")));

        let service = make_service(
            repo_finding(Some(stored_user())),
            MockTokenService::new(),
            hasher,
        );
        let err = service
            .login(&RequestContext::background(), &credentials)
            .await
            .expect_err("malformed hash");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn token_issuing_failure_is_internal(credentials: LoginCredentials) {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_create_token()
            .times(1)
            .returning(|_| Err(TokenError::internal("encryption failed")));

        let service = make_service(
            repo_finding(Some(stored_user())),
            tokens,
            hasher_answering(true),
        );
        let err = service
            .login(&RequestContext::background(), &credentials)
            .await
            .expect_err("token failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
