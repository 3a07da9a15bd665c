//! API layer - HTTP endpoints, pages and middleware

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod web;

pub use router::create_router;
pub use state::AppState;
