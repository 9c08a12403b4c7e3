use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::db;
use crate::meals::repo::{MealStore, PgMealStore};
use crate::memory::MemoryStore;
use crate::users::repo::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub meals: Arc<dyn MealStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match &config.storage {
            StorageBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let pool = db::connect(database_url, *max_connections).await?;
                db::run_migrations(&pool).await?;
                tracing::info!("using postgres storage");
                Ok(Self::from_parts(
                    Arc::new(config),
                    Arc::new(PgUserStore::new(pool.clone())),
                    Arc::new(PgMealStore::new(pool)),
                ))
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage; data is lost on restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        Self::from_parts(Arc::new(config), store.clone(), store)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        meals: Arc<dyn MealStore>,
    ) -> Self {
        Self {
            config,
            users,
            meals,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "STORAGE_BACKEND" => Some("memory".into()),
            _ => None,
        })
        .expect("memory config is valid");
        Self::in_memory(config)
    }
}
