use std::sync::Arc;

use crate::catalog::{CatalogSource, HttpCatalog, StaticCatalog};
use crate::comparison::{ComparisonClient, HttpComparisonClient, MockComparisonEngine};
use crate::config::AppConfig;
use crate::db::{DbPool, create_orm_conn};
use crate::reconcile::Reconciler;
use crate::retailers::RetailerRegistry;
use crate::storage::{DbStore, KeyValueStore, MemoryStore};
use crate::stores::{ManualEntryStore, ManualProductStore, ValidationStore};
use crate::wizard::WizardSessions;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Audit log pool, present when a database is configured.
    pub pool: Option<DbPool>,
    pub registry: Arc<RetailerRegistry>,
    /// Catalog the product list merges with.
    pub catalog: Arc<dyn CatalogSource>,
    /// Bundled mock catalog served under `/api/catalog`.
    pub mock_catalog: Arc<StaticCatalog>,
    /// Endpoint wizard submissions go to.
    pub comparison: Arc<dyn ComparisonClient>,
    /// Mock engine served under `/api/comparison/manual`.
    pub mock_engine: Arc<MockComparisonEngine>,
    pub validation: ValidationStore,
    pub manual_products: ManualProductStore,
    pub manual_entries: ManualEntryStore,
    pub reconciler: Reconciler,
    pub wizards: WizardSessions,
}

impl AppState {
    /// Connects storage as configured: PostgreSQL when `DATABASE_URL` is set,
    /// in-memory otherwise.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        match config.database_url.clone() {
            Some(url) => {
                let orm = create_orm_conn(&url).await?;
                let pool = orm.get_postgres_connection_pool().clone();
                let storage: Arc<dyn KeyValueStore> = Arc::new(DbStore::new(orm));
                Self::new(config, storage, Some(pool)).await
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory storage");
                Self::new(config, Arc::new(MemoryStore::new()), None).await
            }
        }
    }

    pub async fn new(
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        pool: Option<DbPool>,
    ) -> anyhow::Result<Self> {
        let registry = Arc::new(RetailerRegistry::default());

        let mock_catalog = Arc::new(match &config.catalog_path {
            Some(path) => StaticCatalog::from_path(path, registry.clone()).await?,
            None => StaticCatalog::bundled(registry.clone())?,
        });
        let catalog: Arc<dyn CatalogSource> = match &config.catalog_url {
            Some(url) => {
                tracing::info!(%url, "using remote catalog");
                Arc::new(HttpCatalog::new(url.clone(), config.http_timeout, registry.clone())?)
            }
            None => mock_catalog.clone(),
        };

        let mock_engine = Arc::new(MockComparisonEngine::new(
            registry.clone(),
            config.comparison_delay,
        ));
        let comparison: Arc<dyn ComparisonClient> = match &config.comparison_url {
            Some(url) => {
                tracing::info!(%url, "using remote comparison endpoint");
                Arc::new(HttpComparisonClient::new(url.clone(), config.http_timeout)?)
            }
            None => mock_engine.clone(),
        };

        let namespace = config.storage_prefix.as_str();
        let validation = ValidationStore::new(storage.clone(), namespace);
        let manual_products = ManualProductStore::new(storage.clone(), namespace, registry.clone());
        let manual_entries = ManualEntryStore::new(storage, namespace);
        let reconciler = Reconciler::new(
            catalog.clone(),
            manual_products.clone(),
            validation.clone(),
            registry.clone(),
        );

        let wizards = WizardSessions::new(config.wizard_idle_ttl);

        Ok(Self {
            config: Arc::new(config),
            pool,
            registry,
            catalog,
            mock_catalog,
            comparison,
            mock_engine,
            validation,
            manual_products,
            manual_entries,
            reconciler,
            wizards,
        })
    }

    /// In-memory state with the bundled catalog and an instant mock engine.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::new(AppConfig::default(), Arc::new(MemoryStore::new()), None).await
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogSource>) -> Self {
        self.reconciler = Reconciler::new(
            catalog.clone(),
            self.manual_products.clone(),
            self.validation.clone(),
            self.registry.clone(),
        );
        self.catalog = catalog;
        self
    }

    pub fn with_comparison(mut self, comparison: Arc<dyn ComparisonClient>) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn pool(&self) -> Option<&DbPool> {
        self.pool.as_ref()
    }
}
