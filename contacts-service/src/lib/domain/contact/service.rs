use std::sync::Arc;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::models::ContactData;
use crate::domain::contact::models::ContactFilter;
use crate::domain::contact::models::ContactId;
use crate::domain::contact::ports::ContactRepository;
use crate::domain::user::models::UserId;

/// Domain service for per-user contact CRUD.
pub struct ContactService<R>
where
    R: ContactRepository,
{
    repository: Arc<R>,
}

impl<R> ContactService<R>
where
    R: ContactRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create_contact(
        &self,
        data: ContactData,
        user_id: &UserId,
    ) -> Result<Contact, ContactError> {
        self.repository.create(data, user_id).await
    }

    pub async fn list_contacts(
        &self,
        user_id: &UserId,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, ContactError> {
        self.repository.list(user_id, filter).await
    }

    /// # Errors
    /// * `NotFound` - no such contact for this user
    pub async fn get_contact(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Contact, ContactError> {
        self.repository
            .find(id, user_id)
            .await?
            .ok_or(ContactError::NotFound(id.0))
    }

    /// # Errors
    /// * `NotFound` - no such contact for this user
    pub async fn update_contact(
        &self,
        id: &ContactId,
        data: ContactData,
        user_id: &UserId,
    ) -> Result<Contact, ContactError> {
        self.repository
            .update(id, data, user_id)
            .await?
            .ok_or(ContactError::NotFound(id.0))
    }

    /// # Errors
    /// * `NotFound` - no such contact for this user
    pub async fn delete_contact(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Contact, ContactError> {
        self.repository
            .delete(id, user_id)
            .await?
            .ok_or(ContactError::NotFound(id.0))
    }
}
