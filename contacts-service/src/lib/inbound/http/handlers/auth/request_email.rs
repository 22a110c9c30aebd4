use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::dispatch_confirmation;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

/// POST /api/auth/request_email
///
/// Re-sends the confirmation email. Answers 200 with a generic message even
/// for unknown addresses, so the endpoint does not reveal which emails have
/// accounts.
pub async fn request_email(
    State(state): State<AppState>,
    Json(body): Json<RequestEmailBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user = state
        .user_service
        .get_by_email(&body.email)
        .await
        .map_err(ApiError::from)?;

    match user {
        Some(user) if user.confirmed => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData::new("Your email has already been confirmed."),
        )),
        Some(user) => {
            dispatch_confirmation(&state, &user);
            Ok(ApiSuccess::new(
                StatusCode::OK,
                MessageData::new("Check your email for confirmation."),
            ))
        }
        None => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData::new("Check your email for confirmation."),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestEmailBody {
    email: String,
}
