use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::models::User;

/// Extension type carrying the resolved user through the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the bearer token to a user and stores it in the
/// request extensions. Resolution goes through the auth service's
/// read-through cache path.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let user = state
        .auth_service
        .resolve_current_user(token)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header".to_string()).into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
        .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
