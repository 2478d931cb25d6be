//! In-memory repository, used for `--mock` runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::Contact;
use crate::domain::repo::ContactsRepository;

#[derive(Default)]
pub struct InMemoryContactsRepository {
    rows: RwLock<HashMap<Uuid, Contact>>,
}

impl InMemoryContactsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut contacts: Vec<Contact>) -> Vec<Contact> {
        contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        contacts
    }
}

#[async_trait]
impl ContactsRepository for InMemoryContactsRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contact>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn insert(&self, c: Contact) -> anyhow::Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(&c.id) {
            anyhow::bail!("insert failed: duplicate id {}", c.id);
        }
        rows.insert(c.id, c);
        Ok(())
    }

    async fn update(&self, c: Contact) -> anyhow::Result<bool> {
        match self.rows.write().get_mut(&c.id) {
            Some(slot) => {
                *slot = c;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.write().remove(&id).is_some())
    }

    async fn list(&self) -> anyhow::Result<Vec<Contact>> {
        let all = self.rows.read().values().cloned().collect();
        Ok(Self::sorted(all))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Contact>> {
        let owned = self
            .rows
            .read()
            .values()
            .filter(|c| c.owner_id == Some(owner_id))
            .cloned()
            .collect();
        Ok(Self::sorted(owned))
    }
}
