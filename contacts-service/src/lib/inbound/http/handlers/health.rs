use axum::extract::State;
use axum::http::StatusCode;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

/// GET /api/healthchecker
///
/// Verifies database connectivity with a trivial query.
pub async fn healthchecker(
    State(state): State<AppState>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData::new("Service is up and the database is reachable."),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            Err(ApiError::InternalServerError(
                "Error connecting to the database".to_string(),
            ))
        }
    }
}
