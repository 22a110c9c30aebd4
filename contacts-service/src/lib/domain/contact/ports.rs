use async_trait::async_trait;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::models::ContactData;
use crate::domain::contact::models::ContactFilter;
use crate::domain::contact::models::ContactId;
use crate::domain::user::models::UserId;

/// Persistence operations for contacts.
///
/// Every operation is scoped to the owning user; an id belonging to another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    /// Persist a new contact for this user.
    async fn create(&self, data: ContactData, user_id: &UserId) -> Result<Contact, ContactError>;

    /// List this user's contacts, narrowed by the filter, ordered by id.
    async fn list(
        &self,
        user_id: &UserId,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, ContactError>;

    /// Retrieve one contact by id, if owned by this user.
    async fn find(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError>;

    /// Replace a contact's fields, if owned by this user.
    async fn update(
        &self,
        id: &ContactId,
        data: ContactData,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError>;

    /// Remove a contact, if owned by this user; returns the removed entity.
    async fn delete(
        &self,
        id: &ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactError>;
}
