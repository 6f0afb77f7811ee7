use crate::config::AppConfig;
use crate::users::{
    password::CredentialHasher,
    repo::{memory::MemoryUserStore, PgUserStore, UserStore},
    CredentialService,
};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: CredentialService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; accounts are kept in memory only");
                Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        Self::from_parts(config, store)
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::from_config(&config.hashing)?;
        Ok(Self {
            config,
            users: CredentialService::new(store, hasher),
        })
    }

    /// In-memory store with cheap hashing.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig::in_memory());
        let hasher = CredentialHasher::from_config(&config.hashing)
            .unwrap_or_default();
        Self {
            config,
            users: CredentialService::new(Arc::new(MemoryUserStore::new()), hasher),
        }
    }
}
