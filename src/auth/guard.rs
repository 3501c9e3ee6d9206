//! Route guard for the role-scoped page prefixes.
//!
//! Stateless: every matching request is evaluated against the cookie it
//! carries, and the only possible side effect is a redirect to the login
//! page with the original path preserved in the `from` parameter.

use axum::{
    extract::{FromRef, Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::session::{cookie_value, Role, SessionKeys};
use crate::state::AppState;

#[derive(Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Which role a path demands, if any. The login sub-paths and the API
/// prefix are exempt; everything outside the two scoped prefixes is public.
fn required_role(path: &str) -> Option<Role> {
    if path.starts_with("/api/") {
        return None;
    }
    if (path == "/admin" || path.starts_with("/admin/")) && !path.starts_with("/admin/login") {
        return Some(Role::Admin);
    }
    if (path == "/employee" || path.starts_with("/employee/"))
        && !path.starts_with("/employee/login")
    {
        return Some(Role::Employee);
    }
    None
}

pub fn evaluate(path: &str, cookie_header: Option<&str>, keys: &SessionKeys) -> GuardDecision {
    let Some(role) = required_role(path) else {
        return GuardDecision::Allow;
    };

    let valid = cookie_header
        .and_then(|header| cookie_value(header, role.cookie_name()))
        .is_some_and(|token| keys.verify_role(token, role).is_ok());

    if valid {
        GuardDecision::Allow
    } else {
        debug!(%path, required = ?role, "no valid session, redirecting to login");
        GuardDecision::Redirect(format!("/login?from={}", urlencoding::encode(path)))
    }
}

pub async fn route_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let keys = SessionKeys::from_ref(&state);
    let cookie_header = req
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok());

    match evaluate(req.uri().path(), cookie_header, &keys) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(location) => Redirect::temporary(&location).into_response(),
    }
}
