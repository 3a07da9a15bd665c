//! Path extractor for user ids that answers 404 for ids no user can have

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use super::error::WebError;
use crate::domain::UserId;

/// `{id}` path segment parsed as a [`UserId`]
///
/// A segment that is not a positive integer can never name a stored user,
/// so it is rejected as not found rather than as a bad request.
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<UserId>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(UserIdPath(id)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unparseable user id in path");
                Err(WebError::not_found("User not found"))
            }
        }
    }
}
