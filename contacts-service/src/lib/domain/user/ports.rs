use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::CacheError;
use crate::user::errors::MailerError;
use crate::user::errors::UserError;

/// Persistence operations for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new, unconfirmed account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Flip the confirmation flag for the account with this email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn mark_confirmed(&self, email: &str) -> Result<User, UserError>;

    /// Replace the avatar URL for the account with this email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, UserError>;

    /// Overwrite the stored password hash for the account with this email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn set_password_hash(&self, email: &str, password_hash: &str)
        -> Result<User, UserError>;
}

/// Read-through cache in front of the user store, keyed by username.
///
/// Best-effort only: absence never means the user does not exist, and callers
/// must treat every error as a miss and fall back to the repository.
#[async_trait]
pub trait UserCache: Send + Sync + 'static {
    /// Look up a cached user snapshot.
    async fn get(&self, username: &str) -> Result<Option<User>, CacheError>;

    /// Store a user snapshot, expiring after `ttl`.
    async fn put(&self, user: &User, ttl: Duration) -> Result<(), CacheError>;
}

/// Outbound email dispatch.
///
/// Dispatch is fire-and-forget relative to the request that triggered it;
/// callers log failures and never surface them.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send an email-confirmation message carrying the given token.
    async fn send_confirmation(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError>;

    /// Send a password-reset message carrying the given token.
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError>;
}
