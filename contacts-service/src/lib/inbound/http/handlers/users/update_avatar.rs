use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::UserRole;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// PATCH /api/users/avatar
///
/// Replaces the caller's avatar URL and refreshes the cached snapshot.
/// When `policy.avatar_requires_admin` is set the operation is gated on the
/// admin role.
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateAvatarRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    if state.avatar_requires_admin {
        state
            .auth_service
            .require_role(&user, UserRole::Admin)
            .map_err(ApiError::from)?;
    }

    let updated = state
        .user_service
        .update_avatar(user.email.as_str(), &body.avatar_url)
        .await
        .map_err(ApiError::from)?;

    state.auth_service.refresh_cached_user(&updated).await;

    Ok(ApiSuccess::new(StatusCode::OK, UserData::from(&updated)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAvatarRequest {
    avatar_url: String,
}
