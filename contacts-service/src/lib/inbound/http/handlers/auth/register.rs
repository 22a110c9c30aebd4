use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::dispatch_confirmation;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UsernameError;

/// POST /api/auth/register
///
/// Creates an unconfirmed account and dispatches a confirmation email in the
/// background. Duplicate email or username answers 409.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    dispatch_confirmation(&state, &user);

    Ok(ApiSuccess::new(StatusCode::CREATED, UserData::from(&user)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let role = match self.role {
            Some(role) => role.parse()?,
            None => UserRole::User,
        };
        Ok(RegisterUserCommand::new(username, email, self.password, role))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
