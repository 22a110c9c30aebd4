use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifetime of email-action tokens (confirmation links), fixed at 7 days.
pub const EMAIL_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Token payload for every token this service issues.
///
/// Access tokens carry `sub` (username) and `exp`. Email-confirmation tokens
/// carry `sub` (email), `exp`, and `iat`. Password-reset tokens additionally
/// carry the already-hashed replacement password in `password` so the reset
/// endpoint never sees the plaintext again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: username for access tokens, email for email-action tokens.
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp), set on email-action tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Replacement password hash, set on password-reset tokens only.
    /// Never a plaintext password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Claims {
    /// Claims for a session access token.
    pub fn access(subject: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            sub: subject.into(),
            exp: Utc::now().timestamp() + ttl_seconds,
            iat: None,
            password: None,
        }
    }

    /// Claims for an email-confirmation token, valid for 7 days.
    pub fn email_confirmation(email: impl Into<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: email.into(),
            exp: now + EMAIL_TOKEN_TTL_SECONDS,
            iat: Some(now),
            password: None,
        }
    }

    /// Claims for a password-reset token carrying the new, pre-hashed
    /// password.
    pub fn password_reset(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            sub: email.into(),
            exp: Utc::now().timestamp() + ttl_seconds,
            iat: None,
            password: Some(password_hash.into()),
        }
    }
}
