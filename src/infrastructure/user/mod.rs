//! User infrastructure module
//!
//! Store implementations (in-memory and PostgreSQL), the update pause hook,
//! and the user service that drives the fetch, mutate, commit cycle.

mod in_memory;
mod pause;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryUserStore;
pub use pause::{FixedDelay, NoDelay, UpdatePause};
pub use postgres_repository::PostgresUserStore;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
