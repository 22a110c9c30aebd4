use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::contact::errors::ContactDataError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::models::ContactData;
use crate::inbound::http::handlers::ApiError;

pub mod create_contact;
pub mod delete_contact;
pub mod get_contact;
pub mod list_contacts;
pub mod update_contact;

/// Request body shared by contact create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactBody {
    firstname: String,
    lastname: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    comment: Option<String>,
}

impl ContactBody {
    pub(crate) fn try_into_data(self) -> Result<ContactData, ContactDataError> {
        ContactData::new(
            self.firstname,
            self.lastname,
            self.email,
            self.phone,
            self.birthday,
            self.comment,
        )
    }
}

impl From<ContactDataError> for ApiError {
    fn from(err: ContactDataError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Contact representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponseData {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Contact> for ContactResponseData {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.0,
            firstname: contact.firstname.clone(),
            lastname: contact.lastname.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            birthday: contact.birthday,
            comment: contact.comment.clone(),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}
