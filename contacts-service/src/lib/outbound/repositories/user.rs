use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, role, is_confirmed, created_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    avatar: Option<String>,
    role: String,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            avatar: self.avatar,
            role: UserRole::from_str(&self.role)?,
            confirmed: self.is_confirmed,
            created_at: self.created_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error, user: &NewUser) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(user.username.to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(user.email.to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, avatar, role, is_confirmed)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        row.into_user()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn mark_confirmed(&self, email: &str) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET is_confirmed = TRUE WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.ok_or_else(|| UserError::NotFound(email.to_string()))?
            .into_user()
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET avatar = $2 WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.ok_or_else(|| UserError::NotFound(email.to_string()))?
            .into_user()
    }

    async fn set_password_hash(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET password_hash = $2 WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.ok_or_else(|| UserError::NotFound(email.to_string()))?
            .into_user()
    }
}
