//! Idempotent schema bootstrap for the users table

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// DDL for the users table; safe to run on every start
pub const USERS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    version BIGINT NOT NULL DEFAULT 1
)
"#;

pub const USERS_USERNAME_INDEX_DDL: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)";

/// Create the users table and its index if they do not exist
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), DomainError> {
    for statement in [USERS_TABLE_DDL, USERS_USERNAME_INDEX_DDL] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to bootstrap schema: {}", e)))?;
    }

    info!("Users schema ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_is_idempotent() {
        assert!(USERS_TABLE_DDL.contains("IF NOT EXISTS"));
        assert!(USERS_USERNAME_INDEX_DDL.contains("IF NOT EXISTS"));
    }

    #[test]
    fn test_ddl_declares_required_columns() {
        for column in [
            "username TEXT NOT NULL",
            "email TEXT NOT NULL",
            "version BIGINT NOT NULL DEFAULT 1",
        ] {
            assert!(USERS_TABLE_DDL.contains(column), "missing {}", column);
        }
    }
}
