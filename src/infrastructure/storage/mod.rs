//! Storage infrastructure - connection pooling and schema bootstrap

mod postgres;
mod schema;

pub use postgres::connect_pool;
pub use schema::bootstrap_schema;
