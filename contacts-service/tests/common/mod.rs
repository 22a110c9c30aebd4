use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use auth::TokenCodec;
use chrono::Utc;
use contacts_service::domain::auth::service::AuthService;
use contacts_service::domain::contact::errors::ContactError;
use contacts_service::domain::contact::models::Contact;
use contacts_service::domain::contact::models::ContactData;
use contacts_service::domain::contact::models::ContactFilter;
use contacts_service::domain::contact::models::ContactId;
use contacts_service::domain::contact::ports::ContactRepository;
use contacts_service::domain::contact::service::ContactService;
use contacts_service::domain::user::models::EmailAddress;
use contacts_service::domain::user::models::NewUser;
use contacts_service::domain::user::models::RegisterUserCommand;
use contacts_service::domain::user::models::User;
use contacts_service::domain::user::models::UserId;
use contacts_service::domain::user::models::UserRole;
use contacts_service::domain::user::models::Username;
use contacts_service::domain::user::ports::UserCache;
use contacts_service::domain::user::ports::UserRepository;
use contacts_service::domain::user::service::UserService;
use contacts_service::user::errors::CacheError;
use contacts_service::user::errors::UserError;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const SESSION_TTL_SECONDS: i64 = 3600;

/// In-memory user store mirroring the Postgres repository's semantics,
/// including unique-constraint conflicts. Counts username lookups so tests
/// can observe whether the read-through cache short-circuits the store.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
    username_lookups: AtomicUsize,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            username_lookups: AtomicUsize::new(0),
        }
    }

    pub fn username_lookups(&self) -> usize {
        self.username_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let created = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            avatar: user.avatar,
            role: user.role,
            confirmed: false,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.username_lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username.as_str() == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn mark_confirmed(&self, email: &str) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email.as_str() == email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;
        user.confirmed = true;
        Ok(user.clone())
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email.as_str() == email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;
        user.avatar = Some(url.to_string());
        Ok(user.clone())
    }

    async fn set_password_hash(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email.as_str() == email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;
        user.password_hash = password_hash.to_string();
        Ok(user.clone())
    }
}

/// In-memory user cache honoring per-entry TTLs.
#[derive(Default)]
pub struct InMemoryUserCache {
    entries: Mutex<HashMap<String, (User, Instant)>>,
}

impl InMemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, username: &str) -> Result<Option<User>, CacheError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(username)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(user, _)| user.clone()))
    }

    async fn put(&self, user: &User, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            user.username.as_str().to_string(),
            (user.clone(), Instant::now() + ttl),
        );
        Ok(())
    }
}

/// In-memory contact store mirroring the Postgres repository's filter and
/// pagination semantics.
#[derive(Default)]
pub struct InMemoryContacts {
    contacts: Mutex<Vec<Contact>>,
    next_id: AtomicI64,
}

impl InMemoryContacts {
    pub fn new() -> Self {
        Self {
            contacts: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn matches_substring(value: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl ContactRepository for InMemoryContacts {
    async fn create(&self, data: ContactData, user_id: &UserId) -> Result<Contact, ContactError> {
        let contact = Contact {
            id: ContactId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            firstname: data.firstname,
            lastname: data.lastname,
            email: data.email,
            phone: data.phone,
            birthday: data.birthday,
            comment: data.comment,
            created_at: Utc::now(),
            updated_at: None,
            user_id: *user_id,
        };
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(contact)
    }

    async fn list(
        &self,
        user_id: &UserId,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, ContactError> {
        let today = Utc::now().date_naive();
        let contacts = self.contacts.lock().unwrap();

        let mut matched: Vec<Contact> = contacts
            .iter()
            .filter(|c| c.user_id == *user_id)
            .filter(|c| matches_substring(&c.firstname, &filter.firstname))
            .filter(|c| matches_substring(&c.lastname, &filter.lastname))
            .filter(|c| matches_substring(&c.email, &filter.email))
            .filter(|c| match filter.upcoming_birthday_days {
                Some(days) => {
                    c.birthday >= today && c.birthday <= today + chrono::Days::new(days as u64)
                }
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.id.0);

        Ok(matched
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn find(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter()
            .find(|c| c.id == *id && c.user_id == *user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: &ContactId,
        data: ContactData,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == *id && c.user_id == *user_id);

        Ok(contact.map(|c| {
            c.firstname = data.firstname;
            c.lastname = data.lastname;
            c.email = data.email;
            c.phone = data.phone;
            c.birthday = data.birthday;
            c.comment = data.comment;
            c.updated_at = Some(Utc::now());
            c.clone()
        }))
    }

    async fn delete(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let mut contacts = self.contacts.lock().unwrap();
        let position = contacts
            .iter()
            .position(|c| c.id == *id && c.user_id == *user_id);
        Ok(position.map(|i| contacts.remove(i)))
    }
}

/// Shared fixture wiring the domain services to in-memory adapters, so the
/// full flows run without Postgres, Redis, or an SMTP server.
pub struct TestBackend {
    pub users: Arc<InMemoryUsers>,
    pub cache: Arc<InMemoryUserCache>,
    pub contacts: Arc<InMemoryContacts>,
    pub user_service: UserService<InMemoryUsers>,
    pub auth_service: AuthService<InMemoryUsers, InMemoryUserCache>,
    pub contact_service: ContactService<InMemoryContacts>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::with_cache_ttl(Duration::from_secs(300))
    }

    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        let users = Arc::new(InMemoryUsers::new());
        let cache = Arc::new(InMemoryUserCache::new());
        let contacts = Arc::new(InMemoryContacts::new());

        let user_service = UserService::new(Arc::clone(&users));
        let auth_service = AuthService::new(
            Arc::clone(&users),
            Arc::clone(&cache),
            TokenCodec::new(JWT_SECRET),
            SESSION_TTL_SECONDS,
            cache_ttl,
        );
        let contact_service = ContactService::new(Arc::clone(&contacts));

        Self {
            users,
            cache,
            contacts,
            user_service,
            auth_service,
            contact_service,
        }
    }

    /// Register and confirm an account, returning the stored user.
    pub async fn registered_user(&self, username: &str, email: &str, password: &str) -> User {
        let user = self
            .user_service
            .register(register_command(username, email, password))
            .await
            .expect("registration failed");
        self.user_service
            .confirm_email(user.email.as_str())
            .await
            .expect("confirmation failed");
        user
    }
}

pub fn register_command(username: &str, email: &str, password: &str) -> RegisterUserCommand {
    RegisterUserCommand::new(
        Username::new(username.to_string()).unwrap(),
        EmailAddress::new(email.to_string()).unwrap(),
        password.to_string(),
        UserRole::User,
    )
}

pub fn contact_data(firstname: &str, lastname: &str, email: &str) -> ContactData {
    ContactData::new(
        firstname.to_string(),
        lastname.to_string(),
        email.to_string(),
        "+380501234567".to_string(),
        chrono::NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        None,
    )
    .unwrap()
}
