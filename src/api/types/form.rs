//! Form payloads posted by the HTML pages

use serde::Deserialize;

use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Username and email as submitted by the create and edit forms.
///
/// Missing fields deserialize as empty strings so they reach validation and
/// come back as a 400 rather than a form rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
}

impl From<UserForm> for CreateUserRequest {
    fn from(form: UserForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
        }
    }
}

impl From<UserForm> for UpdateUserRequest {
    fn from(form: UserForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
        }
    }
}
