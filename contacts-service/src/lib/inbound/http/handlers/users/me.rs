use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::CurrentUser;

/// GET /api/users/me
///
/// Returns the user resolved by the bearer middleware, typically straight
/// from the cache.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, UserData::from(&user))
}
