//! User service: the fetch, mutate, commit cycle behind each intent

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{validate_user_fields, NewUser, User, UserId, UserStore};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_user_update, UpdateOutcome};

use super::pause::{NoDelay, UpdatePause};

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

/// Request for replacing a user's editable fields
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
}

/// User service over an injected store and update pause
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    pause: Arc<dyn UpdatePause>,
}

impl UserService {
    /// Create a new user service
    pub fn new(store: Arc<dyn UserStore>, pause: Arc<dyn UpdatePause>) -> Self {
        Self { store, pause }
    }

    /// Create a service whose updates commit without pausing
    pub fn without_pause(store: Arc<dyn UserStore>) -> Self {
        Self::new(store, Arc::new(NoDelay))
    }

    /// List all users ordered by username
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.store.list().await
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_user_fields(&request.username, &request.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let user = self
            .store
            .create(NewUser::new(request.username, request.email))
            .await?;

        info!(user_id = %user.id(), username = %user.username(), "User created");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.store.get(id).await
    }

    /// Apply new field values to a freshly fetched copy and commit it.
    ///
    /// A missing user is reported before any field errors. The copy keeps the
    /// version it was read at; the pause runs between the read and the commit. A `Conflict` from the store is returned as is,
    /// the edit is dropped and nothing is retried.
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.store.get(id).await?;

        validate_user_fields(&request.username, &request.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let read_version = user.version();

        user.set_username(request.username);
        user.set_email(request.email);

        debug!(user_id = %id, version = read_version, "Applied edit, pausing before commit");
        self.pause.pause(id).await;

        match self.store.commit(&user).await {
            Ok(committed) => {
                record_user_update(UpdateOutcome::Committed);
                info!(
                    user_id = %id,
                    version = committed.version(),
                    "User updated"
                );
                Ok(committed)
            }
            Err(e) if e.is_conflict() => {
                record_user_update(UpdateOutcome::Conflict);
                warn!(user_id = %id, version = read_version, error = %e, "Update lost the race");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a user without a version check
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        self.store.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Release the store's resources
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserStore, INITIAL_VERSION};
    use crate::infrastructure::user::InMemoryUserStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Barrier;

    /// Holds every caller until `n` updates have read their copy
    struct BarrierPause(Barrier);

    #[async_trait]
    impl UpdatePause for BarrierPause {
        async fn pause(&self, _id: UserId) {
            self.0.wait().await;
        }
    }

    fn create_service() -> UserService {
        UserService::without_pause(Arc::new(InMemoryUserStore::new()))
    }

    fn make_request(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
        }
    }

    fn make_update(username: &str, email: &str) -> UpdateUserRequest {
        UpdateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
        }
    }

    fn id(value: i64) -> UserId {
        UserId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service.create(make_request("alice", "a@x.com")).await.unwrap();
        assert_eq!(user.username(), "alice");
        assert_eq!(user.version(), INITIAL_VERSION);

        let users = service.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email(), "a@x.com");
    }

    #[tokio::test]
    async fn test_create_user_empty_username() {
        let service = create_service();

        let err = service.create(make_request("", "b@x.com")).await.unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_user() {
        let service = create_service();
        let user = service.create(make_request("alice", "a@x.com")).await.unwrap();

        let updated = service
            .update(user.id(), make_update("alice", "alice@x.com"))
            .await
            .unwrap();

        assert_eq!(updated.email(), "alice@x.com");
        assert_eq!(updated.version(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = create_service();

        let err = service
            .update(id(1), make_update("alice", "a@x.com"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_user_with_empty_field() {
        let service = create_service();

        let err = service
            .update(id(9), make_update("", "a@x.com"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_email() {
        let service = create_service();
        let user = service.create(make_request("alice", "a@x.com")).await.unwrap();

        let err = service
            .update(user.id(), make_update("alice", ""))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(user.id()).await.unwrap().version(), INITIAL_VERSION);
    }

    #[tokio::test]
    async fn test_concurrent_updates_exactly_one_wins() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = UserService::new(store.clone(), Arc::new(BarrierPause(Barrier::new(2))));
        let user = service.create(make_request("alice", "a@x.com")).await.unwrap();

        let first = {
            let service = service.clone();
            let id = user.id();
            tokio::spawn(async move { service.update(id, make_update("alice", "one@x.com")).await })
        };
        let second = {
            let service = service.clone();
            let id = user.id();
            tokio::spawn(async move { service.update(id, make_update("bob", "two@x.com")).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let winners: Vec<&User> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_conflict()))
            .count();

        assert_eq!(winners.len(), 1);
        assert_eq!(conflicts, 1);
        assert_eq!(winners[0].version(), 2);

        let persisted = service.get(user.id()).await.unwrap();
        assert_eq!(&persisted, winners[0]);
    }

    #[tokio::test]
    async fn test_update_commits_version_read_at_fetch() {
        let fetched = User::restore(id(3), "alice", "a@x.com", Utc::now(), Utc::now(), 7);
        let returned = fetched.clone();

        let mut store = MockUserStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(returned.clone()));
        store
            .expect_commit()
            .withf(|u: &User| u.version() == 7 && u.username() == "alicia")
            .times(1)
            .returning(|u| Ok(u.next_revision(Utc::now())));

        let service = UserService::without_pause(Arc::new(store));
        let committed = service
            .update(id(3), make_update("alicia", "a@x.com"))
            .await
            .unwrap();

        assert_eq!(committed.version(), 8);
    }

    #[tokio::test]
    async fn test_update_passes_storage_errors_through() {
        let fetched = User::restore(id(3), "alice", "a@x.com", Utc::now(), Utc::now(), 1);

        let mut store = MockUserStore::new();
        store.expect_get().returning(move |_| Ok(fetched.clone()));
        store
            .expect_commit()
            .returning(|_| Err(DomainError::storage("connection reset")));

        let service = UserService::without_pause(Arc::new(store));
        let err = service
            .update(id(3), make_update("alice", "a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let service = create_service();
        let user = service.create(make_request("alice", "a@x.com")).await.unwrap();

        service.delete(user.id()).await.unwrap();

        assert!(service.get(user.id()).await.unwrap_err().is_not_found());
        assert!(service.delete(user.id()).await.unwrap_err().is_not_found());
    }
}
