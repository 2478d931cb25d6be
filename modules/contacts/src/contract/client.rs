use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::ContactsError,
    model::{Contact, ContactPatch, ContactQuery, NewContact},
};

/// Public API trait for the contacts module that other modules can use
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Get a contact by ID. A missing contact is `Ok(None)`, not an error.
    async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, ContactsError>;

    /// List contacts, optionally filtered by owner and/or a search term
    async fn list_contacts(&self, query: ContactQuery) -> Result<Vec<Contact>, ContactsError>;

    /// Create a new contact
    async fn create_contact(&self, new_contact: NewContact) -> Result<Contact, ContactsError>;

    /// Edit an existing contact
    async fn update_contact(&self, id: Uuid, patch: ContactPatch)
        -> Result<Contact, ContactsError>;

    /// Delete a contact by ID
    async fn delete_contact(&self, id: Uuid) -> Result<(), ContactsError>;
}
