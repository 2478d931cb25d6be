#![allow(dead_code)]

use std::sync::Arc;

use contacts::contract::model::NewContact;
use contacts::domain::service::Service;
use contacts::infra::storage::memory::InMemoryContactsRepository;
use contacts::infra::storage::migrations::Migrator;
use contacts::infra::storage::sea_orm_repo::SeaOrmContactsRepository;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Service over the in-memory repository.
pub fn memory_service() -> Arc<Service> {
    Arc::new(Service::new(Arc::new(InMemoryContactsRepository::new())))
}

/// Fresh in-memory SQLite DB with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Service over a SeaORM repository backed by a fresh SQLite DB.
pub async fn sqlite_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(Arc::new(SeaOrmContactsRepository::new(db))))
}

pub fn ada() -> NewContact {
    NewContact {
        last_name: Some("Lovelace".to_string()),
        ..NewContact::new("Ada")
    }
}
