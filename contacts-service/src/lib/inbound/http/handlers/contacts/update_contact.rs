use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ContactBody;
use super::ContactResponseData;
use crate::domain::contact::models::ContactId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// PUT /api/contacts/{contact_id}
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(contact_id): Path<i64>,
    Json(body): Json<ContactBody>,
) -> Result<ApiSuccess<ContactResponseData>, ApiError> {
    let data = body.try_into_data()?;

    state
        .contact_service
        .update_contact(&ContactId(contact_id), data, &user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref contact| ApiSuccess::new(StatusCode::OK, contact.into()))
}
