//! Page templates and the user view they render

use askama::Template;
use axum::response::Html;

use crate::api::types::WebError;
use crate::domain::User;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// User fields formatted for display
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at().format(TIMESTAMP_FORMAT).to_string(),
            updated_at: user.updated_at().format(TIMESTAMP_FORMAT).to_string(),
            version: user.version(),
        }
    }
}

#[derive(Template)]
#[template(path = "user/index.html")]
pub struct UserIndexPage {
    pub users: Vec<UserView>,
}

#[derive(Template)]
#[template(path = "user/show.html")]
pub struct UserShowPage {
    pub user: UserView,
}

#[derive(Template)]
#[template(path = "user/edit.html")]
pub struct UserEditPage {
    pub user: UserView,
}

#[derive(Template)]
#[template(path = "user/delete.html")]
pub struct UserDeletePage {
    pub user: UserView,
}

/// Render a page, mapping template failures to a 500
pub fn render<T: Template>(page: &T) -> Result<Html<String>, WebError> {
    page.render().map(Html).map_err(|e| {
        tracing::error!(error = %e, "Failed to render template");
        WebError::internal("Failed to render page")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::{TimeZone, Utc};

    fn sample_user() -> User {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        User::restore(UserId::new(4).unwrap(), "alice", "a@x.com", at, at, 2)
    }

    #[test]
    fn test_user_view_from_user() {
        let view = UserView::from(&sample_user());

        assert_eq!(view.id, 4);
        assert_eq!(view.created_at, "2024-03-01 12:30:00 UTC");
        assert_eq!(view.version, 2);
    }

    #[test]
    fn test_index_lists_users() {
        let page = UserIndexPage {
            users: vec![UserView::from(&sample_user())],
        };

        let html = render(&page).unwrap().0;
        assert!(html.contains("href=\"/user/4\""));
        assert!(html.contains("a@x.com"));
    }

    #[test]
    fn test_empty_index() {
        let html = render(&UserIndexPage { users: vec![] }).unwrap().0;
        assert!(html.contains("No users yet."));
    }

    #[test]
    fn test_fields_are_escaped() {
        let at = Utc::now();
        let user = User::restore(UserId::new(1).unwrap(), "<b>bob</b>", "b@x.com", at, at, 1);
        let page = UserShowPage {
            user: UserView::from(&user),
        };

        let html = render(&page).unwrap().0;
        assert!(!html.contains("<b>bob</b>"));
        assert!(html.contains("&lt;b&gt;bob&lt;/b&gt;"));
    }

    #[test]
    fn test_edit_form_posts_to_user() {
        let page = UserEditPage {
            user: UserView::from(&sample_user()),
        };

        let html = render(&page).unwrap().0;
        assert!(html.contains("action=\"/user/4\""));
        assert!(html.contains("value=\"alice\""));
    }
}
