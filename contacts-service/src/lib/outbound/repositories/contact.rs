use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::models::ContactData;
use crate::domain::contact::models::ContactFilter;
use crate::domain::contact::models::ContactId;
use crate::domain::contact::ports::ContactRepository;
use crate::domain::user::models::UserId;

const CONTACT_COLUMNS: &str =
    "id, firstname, lastname, email, phone, birthday, comment, created_at, updated_at, user_id";

pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i64,
    firstname: String,
    lastname: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    user_id: i64,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: ContactId(row.id),
            firstname: row.firstname,
            lastname: row.lastname,
            email: row.email,
            phone: row.phone,
            birthday: row.birthday,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: UserId(row.user_id),
        }
    }
}

fn db_error(e: sqlx::Error) -> ContactError {
    ContactError::DatabaseError(e.to_string())
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn create(&self, data: ContactData, user_id: &UserId) -> Result<Contact, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            INSERT INTO contacts (firstname, lastname, email, phone, birthday, comment, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birthday)
        .bind(&data.comment)
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn list(
        &self,
        user_id: &UserId,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, ContactError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
              AND ($2::text IS NULL OR firstname ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR lastname ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR email ILIKE '%' || $4 || '%')
              AND ($5::int IS NULL OR birthday BETWEEN CURRENT_DATE AND CURRENT_DATE + $5)
            ORDER BY id
            OFFSET $6 LIMIT $7
            "#
        ))
        .bind(user_id.0)
        .bind(&filter.firstname)
        .bind(&filter.lastname)
        .bind(&filter.email)
        .bind(filter.upcoming_birthday_days)
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Contact::from))
    }

    async fn update(
        &self,
        id: &ContactId,
        data: ContactData,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            UPDATE contacts
            SET firstname = $3, lastname = $4, email = $5, phone = $6,
                birthday = $7, comment = $8, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(user_id.0)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birthday)
        .bind(&data.comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Contact::from))
    }

    async fn delete(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Contact::from))
    }
}
