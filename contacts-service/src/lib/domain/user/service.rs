use std::sync::Arc;

use auth::PasswordHasher;
use sha2::Digest;
use sha2::Sha256;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Outcome of an email-confirmation attempt.
///
/// Confirming twice is not an error; the second attempt reports
/// `AlreadyConfirmed` without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailConfirmation {
    Confirmed,
    AlreadyConfirmed,
}

/// Domain service for account lifecycle operations.
///
/// Owns password hashing; issues no tokens and sends no mail itself — the
/// HTTP layer orchestrates dispatch around these operations.
pub struct UserService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Register a new, unconfirmed account.
    ///
    /// Email and username uniqueness are checked up front so the caller gets
    /// a precise conflict; the store's unique constraints remain the final
    /// arbiter under concurrent registration.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - duplicate identity
    /// * `DatabaseError` - store operation failed
    pub async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if let Some(existing) = self.repository.find_by_email(command.email.as_str()).await? {
            return Err(UserError::EmailAlreadyExists(existing.email.to_string()));
        }

        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(command.username.to_string()));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let avatar = Some(gravatar_url(command.email.as_str()));

        self.repository
            .create(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
                avatar,
                role: command.role,
            })
            .await
    }

    /// Retrieve an account by email, if present.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.repository.find_by_email(email).await
    }

    /// Mark the account with this email confirmed.
    ///
    /// # Errors
    /// * `NotFound` - no account with this email
    pub async fn confirm_email(&self, email: &str) -> Result<EmailConfirmation, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        if user.confirmed {
            return Ok(EmailConfirmation::AlreadyConfirmed);
        }

        self.repository.mark_confirmed(email).await?;
        Ok(EmailConfirmation::Confirmed)
    }

    /// Resolve the account behind a reset request and pre-hash the
    /// replacement password for embedding in the reset token.
    ///
    /// The plaintext is hashed here, before any token or mail exists, so no
    /// later step ever sees it.
    ///
    /// # Errors
    /// * `NotFound` - no account with this email
    pub async fn prepare_password_reset(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<(User, String), UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        let password_hash = self.password_hasher.hash(new_password)?;
        Ok((user, password_hash))
    }

    /// Overwrite the stored hash with one extracted from a reset token.
    ///
    /// # Errors
    /// * `NotFound` - the account no longer exists
    pub async fn complete_password_reset(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        self.repository.set_password_hash(email, password_hash).await
    }

    /// Replace the avatar URL for the account with this email.
    pub async fn update_avatar(&self, email: &str, url: &str) -> Result<User, UserError> {
        self.repository.set_avatar(email, url).await
    }
}

/// Default avatar for fresh accounts: the Gravatar image for the email,
/// falling back to an identicon when the address has none.
fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserRole;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn mark_confirmed(&self, email: &str) -> Result<User, UserError>;
            async fn set_avatar(&self, email: &str, url: &str) -> Result<User, UserError>;
            async fn set_password_hash(&self, email: &str, password_hash: &str) -> Result<User, UserError>;
        }
    }

    fn stored_user(confirmed: bool) -> User {
        User {
            id: UserId(1),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            avatar: None,
            role: UserRole::User,
            confirmed,
            created_at: Utc::now(),
        }
    }

    fn register_command() -> RegisterUserCommand {
        RegisterUserCommand::new(
            Username::new("testuser".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "pw123456".to_string(),
            UserRole::User,
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .with(eq("test@example.com"))
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_username()
            .with(eq("testuser"))
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.avatar.as_deref().is_some_and(|a| a.contains("gravatar"))
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId(1),
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                    avatar: user.avatar,
                    role: user.role,
                    confirmed: false,
                    created_at: Utc::now(),
                })
            });

        let service = UserService::new(Arc::new(repository));

        let user = service.register(register_command()).await.unwrap();
        assert!(!user.confirmed);
        // The hash is never the plaintext.
        assert_ne!(user.password_hash, "pw123456");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(true))));
        repository.expect_find_by_username().times(0);
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.register(register_command()).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(stored_user(true))));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.register(register_command()).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_confirm_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .with(eq("test@example.com"))
            .times(1)
            .returning(|_| Ok(Some(stored_user(false))));
        repository
            .expect_mark_confirmed()
            .with(eq("test@example.com"))
            .times(1)
            .returning(|_| Ok(stored_user(true)));

        let service = UserService::new(Arc::new(repository));

        let outcome = service.confirm_email("test@example.com").await.unwrap();
        assert_eq!(outcome, EmailConfirmation::Confirmed);
    }

    #[tokio::test]
    async fn test_confirm_email_is_idempotent() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(true))));
        // Already confirmed: no second mutation.
        repository.expect_mark_confirmed().times(0);

        let service = UserService::new(Arc::new(repository));

        let outcome = service.confirm_email("test@example.com").await.unwrap();
        assert_eq!(outcome, EmailConfirmation::AlreadyConfirmed);
    }

    #[tokio::test]
    async fn test_confirm_email_unknown() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.confirm_email("ghost@example.com").await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_prepare_password_reset_hashes_before_tokenization() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(true))));

        let service = UserService::new(Arc::new(repository));

        let (user, hash) = service
            .prepare_password_reset("test@example.com", "new_password")
            .await
            .unwrap();

        assert_eq!(user.email.as_str(), "test@example.com");
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordHasher::new().verify("new_password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_prepare_password_reset_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service
            .prepare_password_reset("ghost@example.com", "new_password")
            .await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_complete_password_reset() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(true))));
        repository
            .expect_set_password_hash()
            .with(eq("test@example.com"), eq("$argon2id$new_hash"))
            .times(1)
            .returning(|_, _| Ok(stored_user(true)));

        let service = UserService::new(Arc::new(repository));

        let result = service
            .complete_password_reset("test@example.com", "$argon2id$new_hash")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_complete_password_reset_user_vanished() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_set_password_hash().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .complete_password_reset("ghost@example.com", "$argon2id$new_hash")
            .await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[test]
    fn test_gravatar_url_normalizes_email() {
        let a = gravatar_url("Test@Example.com ");
        let b = gravatar_url("test@example.com");
        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
    }
}
