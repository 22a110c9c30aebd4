use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::auth::errors::AuthError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

/// GET /api/auth/confirm_reset_password/{token}
///
/// Finishes a password reset by installing the hash carried in the token.
/// A token that does not decode or lacks the hash claim answers 400; a user
/// that vanished since the request answers 404.
pub async fn confirm_reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let payload = state
        .auth_service
        .reset_payload_from_token(&token)
        .map_err(|e| match e {
            AuthError::InvalidToken => ApiError::BadRequest("Incorrect token".to_string()),
            e => ApiError::from(e),
        })?;

    state
        .user_service
        .complete_password_reset(&payload.email, &payload.password_hash)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Your password has been reset."),
    ))
}
