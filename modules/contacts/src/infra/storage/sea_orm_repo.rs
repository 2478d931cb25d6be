//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built on a
//! `DatabaseConnection` or on a transaction handle.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::contract::Contact;
use crate::domain::repo::ContactsRepository;
use crate::infra::storage::entity::{Column, Entity as ContactEntity};
use crate::infra::storage::mapper::contact_to_active_model;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> ContactsRepository for SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contact>> {
        let found = ContactEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, c: Contact) -> anyhow::Result<()> {
        let _ = contact_to_active_model(c)
            .insert(&self.conn)
            .await
            .context("insert failed")?;
        Ok(())
    }

    async fn update(&self, c: Contact) -> anyhow::Result<bool> {
        match contact_to_active_model(c).update(&self.conn).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("update failed")),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = ContactEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self) -> anyhow::Result<Vec<Contact>> {
        let rows = ContactEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Contact>> {
        let rows = ContactEntity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_owner failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
