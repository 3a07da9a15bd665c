//! User domain
//!
//! Domain types and the store trait for versioned user records.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId, INITIAL_VERSION};
pub use repository::UserStore;
pub use validation::{
    validate_email, validate_user_fields, validate_user_id, validate_username,
    UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserStore;
