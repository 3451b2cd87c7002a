//! One-shot confirmation notices carried across a redirect in a cookie.
//!
//! A successful create, update or delete stores a [Notice] and redirects to the
//! list page, which shows the notice once and removes the cookie.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HxRedirect;

use crate::{alert::Alert, resource::Resource};

/// The name of the cookie holding the pending notice.
pub const NOTICE_COOKIE: &str = "notice";

/// The action that was performed on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    Created,
    Updated,
    Deleted,
}

impl NoticeAction {
    fn key(self) -> &'static str {
        match self {
            NoticeAction::Created => "created",
            NoticeAction::Updated => "updated",
            NoticeAction::Deleted => "deleted",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "created" => Some(NoticeAction::Created),
            "updated" => Some(NoticeAction::Updated),
            "deleted" => Some(NoticeAction::Deleted),
            _ => None,
        }
    }
}

/// A confirmation that `action` was performed on a `resource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub resource: Resource,
    pub action: NoticeAction,
}

impl Notice {
    pub fn new(resource: Resource, action: NoticeAction) -> Self {
        Self { resource, action }
    }

    /// The text shown to the user, e.g. "Status created successfully."
    pub fn message(&self) -> String {
        let label = self.resource.label();
        let mut chars = label.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };

        format!("{label} {} successfully.", self.action.key())
    }

    fn to_cookie_value(self) -> String {
        format!("{}:{}", self.resource.key(), self.action.key())
    }

    fn from_cookie_value(value: &str) -> Option<Self> {
        let (resource, action) = value.split_once(':')?;

        Some(Self {
            resource: Resource::from_key(resource)?,
            action: NoticeAction::from_key(action)?,
        })
    }

    pub fn into_alert(self) -> Alert {
        Alert::Success {
            message: self.message(),
        }
    }
}

/// Store `notice` in the cookie jar and redirect the HTMX client to `url`.
pub fn redirect_with_notice(jar: CookieJar, url: &str, notice: Notice) -> Response {
    let cookie = Cookie::build((NOTICE_COOKIE, notice.to_cookie_value()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (
        jar.add(cookie),
        HxRedirect(url.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Remove the pending notice from the cookie jar, returning it if it was valid.
pub fn take_notice(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let Some(cookie) = jar.get(NOTICE_COOKIE) else {
        return (jar, None);
    };

    let notice = Notice::from_cookie_value(cookie.value());
    let jar = jar.remove(Cookie::build(NOTICE_COOKIE).path("/"));

    (jar, notice)
}
