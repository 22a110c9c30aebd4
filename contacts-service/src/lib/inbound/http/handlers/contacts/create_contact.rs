use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ContactBody;
use super::ContactResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<ContactBody>,
) -> Result<ApiSuccess<ContactResponseData>, ApiError> {
    let data = body.try_into_data()?;

    state
        .contact_service
        .create_contact(data, &user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref contact| ApiSuccess::new(StatusCode::CREATED, contact.into()))
}
