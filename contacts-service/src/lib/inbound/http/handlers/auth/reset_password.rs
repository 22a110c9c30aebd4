use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::dispatch_password_reset;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// POST /api/auth/reset_password
///
/// Starts a password reset: the replacement password is hashed immediately
/// and mailed inside a signed token, so no later step handles the plaintext.
/// Unknown email answers 400.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let (user, password_hash) = state
        .user_service
        .prepare_password_reset(&body.email, &body.password)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::BadRequest("Unknown email address".to_string()),
            e => ApiError::from(e),
        })?;

    let token = state
        .auth_service
        .create_reset_token(user.email.as_str(), &password_hash)
        .map_err(ApiError::from)?;

    dispatch_password_reset(&state, &user, token);

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Check your email to finish resetting your password."),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    email: String,
    password: String,
}
