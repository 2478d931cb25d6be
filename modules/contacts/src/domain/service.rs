use std::sync::Arc;

use crate::contract::model::{Contact, ContactPatch, ContactQuery, NewContact};
use crate::domain::error::DomainError;
use crate::domain::repo::ContactsRepository;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Domain service with the consistency rules for contacts.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ContactsRepository>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn ContactsRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "contacts.service.get_contact", skip(self), fields(contact_id = %id))]
    pub async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, DomainError> {
        debug!("Getting contact by id");

        let contact = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!(found = contact.is_some(), "Contact lookup finished");
        Ok(contact)
    }

    #[instrument(name = "contacts.service.list_contacts", skip(self))]
    pub async fn list_contacts(&self, query: &ContactQuery) -> Result<Vec<Contact>, DomainError> {
        debug!("Listing contacts");

        let contacts = match query.owner_id {
            Some(owner_id) => self.repo.list_by_owner(owner_id).await,
            None => self.repo.list().await,
        }
        .map_err(|e| DomainError::database(e.to_string()))?;

        let contacts: Vec<Contact> = match query.search.as_deref() {
            Some(term) => contacts.into_iter().filter(|c| c.matches(term)).collect(),
            None => contacts,
        };

        debug!("Successfully listed {} contacts", contacts.len());
        Ok(contacts)
    }

    #[instrument(
        name = "contacts.service.create_contact",
        skip(self, new_contact),
        fields(first_name = %new_contact.first_name)
    )]
    pub async fn create_contact(&self, new_contact: NewContact) -> Result<Contact, DomainError> {
        info!("Creating new contact");

        validate_first_name(&new_contact.first_name)?;

        let now = now_millis();
        let contact = Contact {
            id: Uuid::new_v4(),
            first_name: new_contact.first_name,
            last_name: new_contact.last_name,
            email: new_contact.email,
            phone: new_contact.phone,
            title: new_contact.title,
            company_id: new_contact.company_id,
            owner_id: new_contact.owner_id,
            image: new_contact.image,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(contact.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created contact with id={}", contact.id);
        Ok(contact)
    }

    #[instrument(
        name = "contacts.service.update_contact",
        skip(self, patch),
        fields(contact_id = %id)
    )]
    pub async fn update_contact(
        &self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, DomainError> {
        info!("Updating contact");

        validate_first_name(&patch.first_name)?;

        // Load current
        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::contact_not_found(id))?;

        let previous = current.updated_at;
        patch.apply_to(&mut current);
        // updated_at never moves backwards, even if the wall clock does
        current.updated_at = now_millis().max(previous);

        let updated = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        // deleted concurrently after the load
        if !updated {
            return Err(DomainError::contact_not_found(id));
        }

        info!("Successfully updated contact");
        Ok(current)
    }

    #[instrument(
        name = "contacts.service.delete_contact",
        skip(self),
        fields(contact_id = %id)
    )]
    pub async fn delete_contact(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting contact");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if deleted {
            info!("Successfully deleted contact");
        } else {
            debug!("Contact was already absent; nothing to delete");
        }
        Ok(())
    }
}

fn validate_first_name(first_name: &str) -> Result<(), DomainError> {
    if first_name.trim().is_empty() {
        return Err(DomainError::empty_first_name());
    }
    Ok(())
}

/// Current time truncated to whole milliseconds, the resolution timestamps are stored at.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
