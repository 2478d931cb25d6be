use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::ContactsApi,
    error::ContactsError,
    model::{Contact, ContactPatch, ContactQuery, NewContact},
};
use crate::domain::service::Service;

/// Local implementation of the ContactsApi trait that delegates to the domain service
pub struct ContactsLocalClient {
    service: Arc<Service>,
}

impl ContactsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ContactsApi for ContactsLocalClient {
    async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, ContactsError> {
        self.service.get_contact(id).await.map_err(Into::into)
    }

    async fn list_contacts(&self, query: ContactQuery) -> Result<Vec<Contact>, ContactsError> {
        self.service
            .list_contacts(&query)
            .await
            .map_err(Into::into)
    }

    async fn create_contact(&self, new_contact: NewContact) -> Result<Contact, ContactsError> {
        self.service
            .create_contact(new_contact)
            .await
            .map_err(Into::into)
    }

    async fn update_contact(
        &self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, ContactsError> {
        self.service
            .update_contact(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), ContactsError> {
        self.service.delete_contact(id).await.map_err(Into::into)
    }
}
