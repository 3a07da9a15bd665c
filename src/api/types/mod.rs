//! Request and response types for the web layer

pub mod error;
pub mod form;
pub mod path;

pub use error::{WebError, STALE_DATA_MARKER};
pub use form::UserForm;
pub use path::UserIdPath;
