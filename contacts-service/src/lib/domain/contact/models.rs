use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::domain::contact::errors::ContactDataError;
use crate::domain::user::models::UserId;

/// Contact entity, always owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Contact {
    pub id: ContactId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
}

/// Contact unique identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated contact payload used for both create and full update.
#[derive(Debug, Clone)]
pub struct ContactData {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub comment: Option<String>,
}

impl ContactData {
    /// Validate and build a contact payload.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - a field is outside its length bounds
    /// * `InvalidEmail` - the email does not parse
    pub fn new(
        firstname: String,
        lastname: String,
        email: String,
        phone: String,
        birthday: NaiveDate,
        comment: Option<String>,
    ) -> Result<Self, ContactDataError> {
        check_length("firstname", &firstname, 2, 50)?;
        check_length("lastname", &lastname, 2, 50)?;
        check_length("email", &email, 5, 150)?;
        email_address::EmailAddress::from_str(&email)
            .map_err(|e| ContactDataError::InvalidEmail(e.to_string()))?;
        check_length("phone", &phone, 7, 30)?;
        if let Some(comment) = &comment {
            check_length("comment", comment, 1, 500)?;
        }

        Ok(Self {
            firstname,
            lastname,
            email,
            phone,
            birthday,
            comment,
        })
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ContactDataError> {
    let actual = value.len();
    if actual < min {
        return Err(ContactDataError::TooShort { field, min, actual });
    }
    if actual > max {
        return Err(ContactDataError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Optional narrowing criteria for contact listings.
///
/// Name and email filters match case-insensitive substrings; the birthday
/// window selects contacts whose birthday falls between today and today plus
/// the given number of days.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub upcoming_birthday_days: Option<i32>,
    pub skip: i64,
    pub limit: i64,
}
