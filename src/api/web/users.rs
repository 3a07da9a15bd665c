//! User pages: list, create, show, edit, update, delete

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use tracing::debug;

use super::views::{render, UserDeletePage, UserEditPage, UserIndexPage, UserShowPage, UserView};
use crate::api::state::AppState;
use crate::api::types::{UserForm, UserIdPath, WebError};
use crate::domain::UserId;

fn show_location(id: UserId) -> String {
    format!("/user/{}", id)
}

/// GET / and GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;

    render(&UserIndexPage {
        users: users.iter().map(UserView::from).collect(),
    })
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, WebError> {
    debug!(username = %form.username, "Creating user");

    let user = state.user_service.create(form.into()).await?;

    Ok(Redirect::to(&show_location(user.id())))
}

/// GET /user/{id}
pub async fn show_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<Html<String>, WebError> {
    let user = state.user_service.get(id).await?;

    render(&UserShowPage {
        user: UserView::from(&user),
    })
}

/// GET /user/{id}/edit
pub async fn edit_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<Html<String>, WebError> {
    let user = state.user_service.get(id).await?;

    render(&UserEditPage {
        user: UserView::from(&user),
    })
}

/// POST /user/{id}
///
/// A lost version race answers with the stale-data marker, not a redirect.
pub async fn update_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
    Form(form): Form<UserForm>,
) -> Result<Redirect, WebError> {
    debug!(user_id = %id, "Updating user");

    let user = state.user_service.update(id, form.into()).await?;

    Ok(Redirect::to(&show_location(user.id())))
}

/// GET /user/{id}/delete
pub async fn confirm_delete_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<Html<String>, WebError> {
    let user = state.user_service.get(id).await?;

    render(&UserDeletePage {
        user: UserView::from(&user),
    })
}

/// POST /user/{id}/delete
pub async fn delete_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<Redirect, WebError> {
    debug!(user_id = %id, "Deleting user");

    state.user_service.delete(id).await?;

    Ok(Redirect::to("/users"))
}
