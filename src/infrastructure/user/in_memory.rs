//! In-memory user store implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::{validate_user_fields, NewUser, User, UserId, UserStore};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Rows {
    users: HashMap<UserId, User>,
    /// Last assigned ID; only ever grows so deleted IDs are not reused
    last_id: i64,
}

/// In-memory implementation of UserStore
///
/// Every mutation takes the single write guard, so the version check in
/// `commit` and the write that follows it cannot interleave with another
/// commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    rows: Arc<RwLock<Rows>>,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_username(users: &mut [User]) {
    users.sort_by(|a, b| {
        a.username()
            .cmp(b.username())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = self.rows.read().await;
        let mut users: Vec<User> = rows.users.values().cloned().collect();
        sort_by_username(&mut users);
        Ok(users)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        validate_user_fields(&new_user.username, &new_user.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut rows = self.rows.write().await;
        let next_id = rows.last_id + 1;
        let id = UserId::new(next_id)
            .map_err(|e| DomainError::internal(format!("Failed to allocate user ID: {}", e)))?;

        let user = User::new(id, new_user, Utc::now());
        rows.last_id = next_id;
        rows.users.insert(id, user.clone());

        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<User, DomainError> {
        let rows = self.rows.read().await;
        rows.users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    async fn commit(&self, user: &User) -> Result<User, DomainError> {
        validate_user_fields(user.username(), user.email())
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut rows = self.rows.write().await;
        let id = user.id();

        let persisted_version = rows
            .users
            .get(&id)
            .map(User::version)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if persisted_version != user.version() {
            return Err(DomainError::version_conflict(
                id,
                user.version(),
                persisted_version,
            ));
        }

        let committed = user.next_revision(Utc::now());
        rows.users.insert(id, committed.clone());

        Ok(committed)
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;

        match rows.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}
