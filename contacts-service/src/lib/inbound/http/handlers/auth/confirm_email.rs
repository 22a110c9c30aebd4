use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::service::EmailConfirmation;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// GET /api/auth/confirmed_email/{token}
///
/// Confirms the address inside the token. Re-confirming is reported as
/// success without touching state; a token for an unregistered address
/// answers 400, an undecodable token 422.
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = state
        .auth_service
        .email_from_token(&token)
        .map_err(ApiError::from)?;

    match state.user_service.confirm_email(&email).await {
        Ok(EmailConfirmation::Confirmed) => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData::new("Your email has been confirmed."),
        )),
        Ok(EmailConfirmation::AlreadyConfirmed) => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData::new("Your email has already been confirmed."),
        )),
        Err(UserError::NotFound(_)) => {
            Err(ApiError::BadRequest("Verification error".to_string()))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}
