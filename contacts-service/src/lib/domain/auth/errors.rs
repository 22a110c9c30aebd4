use thiserror::Error;

use crate::user::errors::UserError;

/// Failure taxonomy for the authentication service.
///
/// `Unauthorized` is the bearer-resolution wrapper around token failures;
/// `InvalidToken` surfaces directly from the email-action token helpers where
/// the caller maps it to the route's status code.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Email address is not confirmed")]
    NotConfirmed,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("Incorrect token")]
    InvalidToken,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error(transparent)]
    User(#[from] UserError),
}
