//! PostgreSQL user store implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::domain::user::{validate_user_fields, NewUser, User, UserId, UserStore, INITIAL_VERSION};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at, version";

/// PostgreSQL implementation of UserStore
///
/// `commit` issues a conditional `UPDATE ... WHERE version = $n` inside a
/// transaction, so the version check and the write are a single statement
/// from the database's point of view.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY username, id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        validate_user_fields(&new_user.username, &new_user.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, created_at, updated_at, version)
            VALUES ($1, $2, NOW(), NOW(), $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(INITIAL_VERSION)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create user: {}", e)))?;

        row_to_user(&row)
    }

    async fn get(&self, id: UserId) -> Result<User, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn commit(&self, user: &User) -> Result<User, DomainError> {
        validate_user_fields(user.username(), user.email())
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let updated = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, updated_at = NOW(), version = version + 1
            WHERE id = $1 AND version = $4
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id().value())
        .bind(user.username())
        .bind(user.email())
        .bind(user.version())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if let Some(row) = updated {
            let committed = row_to_user(&row)?;
            tx.commit()
                .await
                .map_err(|e| DomainError::storage(format!("Failed to commit user: {}", e)))?;
            return Ok(committed);
        }

        // Nothing matched: tell a missing row apart from a stale version
        let persisted_version: Option<i64> =
            sqlx::query_scalar("SELECT version FROM users WHERE id = $1")
                .bind(user.id().value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to read user version: {}", e))
                })?;

        tx.rollback()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to roll back: {}", e)))?;

        match persisted_version {
            Some(actual) => {
                debug!(
                    user_id = %user.id(),
                    expected = user.version(),
                    actual,
                    "Stale version rejected"
                );
                Err(DomainError::version_conflict(user.id(), user.version(), actual))
            }
            None => Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            ))),
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: i64 = row.try_get("id").map_err(column_error)?;
    let username: String = row.try_get("username").map_err(column_error)?;
    let email: String = row.try_get("email").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;
    let version: i64 = row.try_get("version").map_err(column_error)?;

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id, username, email, created_at, updated_at, version,
    ))
}
