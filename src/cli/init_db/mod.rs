//! Init-db command - bootstraps the users table and exits

use tracing::info;

use crate::infrastructure::storage::{bootstrap_schema, connect_pool};

use super::load_config_and_init_logging;

/// Create the users table in the configured database
pub async fn run() -> anyhow::Result<()> {
    let config = load_config_and_init_logging();

    info!("Connecting to PostgreSQL...");
    let pool = connect_pool(&config.database).await?;

    let result = bootstrap_schema(&pool).await;
    pool.close().await;
    result?;

    info!("Database initialized");

    Ok(())
}
