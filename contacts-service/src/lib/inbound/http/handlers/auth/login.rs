use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// POST /api/auth/login
///
/// Verifies credentials and issues a bearer access token. Unknown username,
/// wrong password, and unconfirmed accounts all answer 401.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let access_token = state
        .auth_service
        .login(&body.username, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenData {
            access_token,
            token_type: "bearer".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub token_type: String,
}
