// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::state::AppState;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::time::Duration;
use tracing::debug;

pub const SESSION_COOKIE: &str = "taskflow_session";

/// Id of the session carried by the request, if its cookie has a valid signature.
pub fn session_id(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

/// Session cookie that the browser drops once the server-side session expires.
pub fn session_cookie(session_id: String, ttl: Duration) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie matching the session cookie's path, for removal.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Lets the request through only when it belongs to a live session.
///
/// The resolved [`SessionUser`](crate::sessions::SessionUser) is stored in the
/// request extensions for the handler. Anything else is sent to the login
/// page without running the handler.
pub async fn require_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let user = session_id(&jar).and_then(|id| state.auth.current_user(&id));

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            debug!(
                "No session for {} {}, redirecting to /login",
                request.method(),
                request.uri().path()
            );
            Redirect::to("/login").into_response()
        }
    }
}
