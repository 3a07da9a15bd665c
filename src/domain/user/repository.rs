//! User store trait

use async_trait::async_trait;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistent storage for users with optimistic concurrency on commit.
///
/// Implementations must make the version comparison in `commit` atomic with
/// the write: no other commit on the same row may land between the check and
/// the update.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// List all users ordered by username ascending
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Create a user at the initial version
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    /// Get a user by ID, failing with `NotFound` if absent
    async fn get(&self, id: UserId) -> Result<User, DomainError>;

    /// Persist the fields of a previously fetched user.
    ///
    /// Fails with `Conflict` when the persisted version differs from
    /// `user.version()`. On success the returned user carries the bumped
    /// version and refreshed `updated_at`.
    async fn commit(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user regardless of its version
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;

    /// Release backing resources
    async fn close(&self) {}
}
