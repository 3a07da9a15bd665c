//! Infrastructure layer - External service implementations

pub mod observability;
pub mod storage;
pub mod user;
