use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ContactResponseData;
use crate::domain::contact::models::ContactId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// DELETE /api/contacts/{contact_id}
///
/// Returns the removed contact.
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(contact_id): Path<i64>,
) -> Result<ApiSuccess<ContactResponseData>, ApiError> {
    state
        .contact_service
        .delete_contact(&ContactId(contact_id), &user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref contact| ApiSuccess::new(StatusCode::OK, contact.into()))
}
