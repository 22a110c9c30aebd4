use std::sync::Arc;
use std::time::Duration;

use auth::Claims;
use auth::PasswordHasher;
use auth::TokenCodec;

use crate::domain::auth::errors::AuthError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserRole;
use crate::user::ports::UserCache;
use crate::user::ports::UserRepository;

/// Email and replacement hash extracted from a password-reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPayload {
    pub email: String,
    pub password_hash: String,
}

/// Authentication service.
///
/// Composes the token codec, the user store, and the read-through user cache:
/// issues access tokens, resolves bearer tokens to users, gates privileged
/// operations by role, and mints/opens the email-action tokens used by the
/// confirmation and reset flows.
pub struct AuthService<R, C>
where
    R: UserRepository,
    C: UserCache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    tokens: TokenCodec,
    password_hasher: PasswordHasher,
    session_ttl_seconds: i64,
    cache_ttl: Duration,
}

impl<R, C> AuthService<R, C>
where
    R: UserRepository,
    C: UserCache,
{
    pub fn new(
        repository: Arc<R>,
        cache: Arc<C>,
        tokens: TokenCodec,
        session_ttl_seconds: i64,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            tokens,
            password_hasher: PasswordHasher::new(),
            session_ttl_seconds,
            cache_ttl,
        }
    }

    /// Issue an access token for a username with the configured session TTL.
    pub fn issue_access_token(&self, username: &str) -> Result<String, AuthError> {
        self.issue_access_token_with_ttl(username, self.session_ttl_seconds)
    }

    /// Issue an access token with an explicit TTL override.
    pub fn issue_access_token_with_ttl(
        &self,
        username: &str,
        ttl_seconds: i64,
    ) -> Result<String, AuthError> {
        self.tokens
            .encode(&Claims::access(username, ttl_seconds))
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - unknown username or password mismatch
    /// * `NotConfirmed` - the account has not confirmed its email
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| AuthError::User(e.into()))?;
        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.confirmed {
            return Err(AuthError::NotConfirmed);
        }

        self.issue_access_token(user.username.as_str())
    }

    /// Resolve a bearer token to its user.
    ///
    /// Read-through path: decode the token, try the cache, fall back to the
    /// store on a miss and repopulate the cache. Cache failures are demoted
    /// to misses; the store stays the source of truth.
    ///
    /// # Errors
    /// * `Unauthorized` - invalid/expired token or unknown subject
    pub async fn resolve_current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims: Claims = self.tokens.decode(token).map_err(|e| {
            tracing::warn!(error = %e, "Bearer token rejected");
            AuthError::Unauthorized
        })?;
        let username = claims.sub;

        match self.cache.get(&username).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "User cache read failed, falling back to store");
            }
        }

        let user = self
            .repository
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        self.refresh_cached_user(&user).await;

        Ok(user)
    }

    /// Re-publish a fresh snapshot after a mutation, shortening (not closing)
    /// the staleness window. Failures are logged and swallowed.
    pub async fn refresh_cached_user(&self, user: &User) {
        if let Err(e) = self.cache.put(user, self.cache_ttl).await {
            tracing::debug!(error = %e, "User cache write failed");
        }
    }

    /// Gate an operation on the user holding exactly this role.
    ///
    /// # Errors
    /// * `Forbidden` - role mismatch
    pub fn require_role(&self, user: &User, role: UserRole) -> Result<(), AuthError> {
        if user.role != role {
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }

    /// Mint a 7-day email-confirmation token for this address.
    pub fn create_confirmation_token(&self, email: &str) -> Result<String, AuthError> {
        self.tokens
            .encode(&Claims::email_confirmation(email))
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))
    }

    /// Extract the email address from an email-action token.
    ///
    /// # Errors
    /// * `InvalidToken` - bad signature, malformed, or expired
    pub fn email_from_token(&self, token: &str) -> Result<String, AuthError> {
        let claims: Claims = self
            .tokens
            .decode(token)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(claims.sub)
    }

    /// Mint a password-reset token carrying the pre-hashed replacement
    /// password. Valid for the session TTL.
    pub fn create_reset_token(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<String, AuthError> {
        self.tokens
            .encode(&Claims::password_reset(
                email,
                password_hash,
                self.session_ttl_seconds,
            ))
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))
    }

    /// Extract email and replacement hash from a password-reset token.
    ///
    /// # Errors
    /// * `InvalidToken` - bad signature, malformed, expired, or the hash
    ///   claim is absent
    pub fn reset_payload_from_token(&self, token: &str) -> Result<ResetPayload, AuthError> {
        let claims: Claims = self
            .tokens
            .decode(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let password_hash = claims.password.ok_or(AuthError::InvalidToken)?;
        Ok(ResetPayload {
            email: claims.sub,
            password_hash,
        })
    }
}
