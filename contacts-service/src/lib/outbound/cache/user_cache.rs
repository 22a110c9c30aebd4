use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserCache;
use crate::user::errors::CacheError;

/// Redis-backed user cache, keyed `user:{username}`.
///
/// Values are JSON snapshots with Redis-side expiry (`SET ... EX`). Errors
/// never propagate past the auth service, which demotes them to misses.
pub struct RedisUserCache {
    client: Client,
}

impl RedisUserCache {
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client =
            Client::open(url).map_err(|e| CacheError::Backend(format!("{}: {}", url, e)))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    fn key(username: &str) -> String {
        format!("user:{}", username)
    }
}

/// Serialized user snapshot stored in the cache.
#[derive(Debug, Serialize, Deserialize)]
struct CachedUser {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    avatar: Option<String>,
    role: UserRole,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            password_hash: user.password_hash.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
            is_confirmed: user.confirmed,
            created_at: user.created_at,
        }
    }
}

impl TryFrom<CachedUser> for User {
    type Error = CacheError;

    fn try_from(cached: CachedUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(cached.id),
            username: Username::new(cached.username)
                .map_err(|e| CacheError::Serialization(e.to_string()))?,
            email: EmailAddress::new(cached.email)
                .map_err(|e| CacheError::Serialization(e.to_string()))?,
            password_hash: cached.password_hash,
            avatar: cached.avatar,
            role: cached.role,
            confirmed: cached.is_confirmed,
            created_at: cached.created_at,
        })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, username: &str) -> Result<Option<User>, CacheError> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(Self::key(username))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        match value {
            Some(json) => {
                let cached: CachedUser = serde_json::from_str(&json)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                Ok(Some(cached.try_into()?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, user: &User, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;

        let json = serde_json::to_string(&CachedUser::from(user))
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        conn.set_ex::<_, _, ()>(Self::key(user.username.as_str()), json, ttl.as_secs())
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}
