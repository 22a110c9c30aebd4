use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ContactResponseData;
use crate::domain::contact::models::ContactFilter;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

const MAX_PAGE_SIZE: i64 = 100;

/// GET /api/contacts
///
/// Lists the caller's contacts, optionally narrowed by name/email substring
/// or an upcoming-birthday window, paginated by skip/limit.
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListContactsQuery>,
) -> Result<ApiSuccess<Vec<ContactResponseData>>, ApiError> {
    let filter = query.into_filter();

    let contacts = state
        .contact_service
        .list_contacts(&user.id, &filter)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        contacts.iter().map(ContactResponseData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListContactsQuery {
    firstname: Option<String>,
    lastname: Option<String>,
    email: Option<String>,
    upcoming_birthday_days: Option<i32>,
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl ListContactsQuery {
    fn into_filter(self) -> ContactFilter {
        ContactFilter {
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            upcoming_birthday_days: self.upcoming_birthday_days,
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }
}
