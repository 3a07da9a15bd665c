//! Server-rendered HTML pages

pub mod users;
pub mod views;

use axum::{routing::get, Router};

use crate::api::state::AppState;

/// Routes for the user pages
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/user/{id}", get(users::show_user).post(users::update_user))
        .route("/user/{id}/edit", get(users::edit_user))
        .route(
            "/user/{id}/delete",
            get(users::confirm_delete_user).post(users::delete_user),
        )
}
