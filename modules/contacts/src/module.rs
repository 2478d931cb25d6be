use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::ContactsConfig;
use crate::contract::client::ContactsApi;
use crate::domain::repo::ContactsRepository;
use crate::domain::service::Service;
use crate::gateways::local::ContactsLocalClient;
use crate::infra::storage::memory::InMemoryContactsRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmContactsRepository;

/// Wiring for the contacts module: one domain service shared by the REST
/// routes and the in-process client.
#[derive(Clone)]
pub struct Contacts {
    service: Arc<Service>,
    config: ContactsConfig,
}

impl Contacts {
    /// Wire the service to an arbitrary storage port.
    pub fn new(repo: Arc<dyn ContactsRepository>, config: ContactsConfig) -> Self {
        Self {
            service: Arc::new(Service::new(repo)),
            config,
        }
    }

    /// Volatile store; contents are lost on restart.
    pub fn in_memory(config: ContactsConfig) -> Self {
        info!("Initializing contacts module with in-memory storage");
        Self::new(Arc::new(InMemoryContactsRepository::new()), config)
    }

    /// Run migrations on `db` and wire the SeaORM repository.
    pub async fn with_database(
        db: DatabaseConnection,
        config: ContactsConfig,
    ) -> anyhow::Result<Self> {
        info!("Running contacts database migrations");
        Migrator::up(&db, None).await?;
        info!("Contacts database migrations completed successfully");

        Ok(Self::new(Arc::new(SeaOrmContactsRepository::new(db)), config))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Local in-process client for other modules.
    pub fn client(&self) -> Arc<dyn ContactsApi> {
        Arc::new(ContactsLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering contacts REST routes");
        let timeout = (self.config.request_timeout_sec > 0)
            .then(|| Duration::from_secs(self.config.request_timeout_sec));
        let router = routes::register_routes(router, self.service.clone(), timeout);
        routes::register_openapi_route(router)
    }
}
