//! Versioned Users
//!
//! A small server-rendered user directory whose update path uses optimistic
//! concurrency control:
//! - Each row carries a version bumped on every commit
//! - A commit holding a stale version is rejected, never merged
//! - Updates pause between read and commit to make races reproducible

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::StorageBackend;
use domain::UserStore;
use infrastructure::storage::{bootstrap_schema, connect_pool};
use infrastructure::user::{FixedDelay, InMemoryUserStore, PostgresUserStore, UserService};
use tracing::info;

/// Build the user store selected by configuration
pub async fn create_user_store(config: &AppConfig) -> anyhow::Result<Arc<dyn UserStore>> {
    info!("Storage backend: {:?}", config.storage.backend);

    let store: Arc<dyn UserStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryUserStore::new()),
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(&config.database).await?;
            info!("PostgreSQL connection established");

            bootstrap_schema(&pool).await?;
            Arc::new(PostgresUserStore::new(pool))
        }
    };

    Ok(store)
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = create_user_store(config).await?;
    let pause = Arc::new(FixedDelay::from_millis(config.users.update_delay_ms));

    info!(
        delay_ms = config.users.update_delay_ms,
        "Update commit delay configured"
    );

    Ok(AppState::new(UserService::new(store, pause)))
}
