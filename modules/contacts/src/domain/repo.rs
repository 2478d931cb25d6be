use crate::contract::model::Contact;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Each call is expected to be atomic on its own; nothing here spans calls.
#[async_trait]
pub trait ContactsRepository: Send + Sync {
    /// Load a contact by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contact>>;
    /// Insert a fully-formed domain contact.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert(&self, c: Contact) -> anyhow::Result<()>;
    /// Overwrite an existing contact (by primary key in `c.id`).
    /// Returns false if no such row exists any more.
    async fn update(&self, c: Contact) -> anyhow::Result<bool>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// All contacts, oldest first.
    async fn list(&self) -> anyhow::Result<Vec<Contact>>;
    /// Contacts managed by `owner_id`, oldest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Contact>>;
}
