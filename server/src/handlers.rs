// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::{AppError, AppResult};
use crate::guard::{self, expired_session_cookie, session_cookie};
use crate::sessions::SessionUser;
use crate::state::AppState;

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use common::{CredentialsPayload, Stats, TaskId, TaskPayload};
use tracing::{debug, error, info};

/// Renders a form page again with the error inline, keeping the error's status.
fn form_error<F>(err: AppError, render: F) -> Response
where
    F: FnOnce(Option<&str>) -> anyhow::Result<String>,
{
    if let AppError::Storage(inner) = &err {
        error!("Internal server error: {:?}", inner);
    }
    match render(Some(&err.public_message())) {
        Ok(page) => (err.status_code(), Html(page)).into_response(),
        Err(render_err) => AppError::from(render_err).into_response(),
    }
}

pub async fn register_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.views.register_page(None)?))
}

pub async fn register(
    State(state): State<AppState>,
    Form(payload): Form<CredentialsPayload>,
) -> Response {
    debug!("Received registration for username: {}", payload.username);
    match state.auth.register(&payload).await {
        Ok(user) => {
            info!("Registered user ID: {}", user.id);
            Redirect::to("/login").into_response()
        }
        Err(err) => form_error(err, |message| state.views.register_page(message)),
    }
}

pub async fn login_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.views.login_page(None)?))
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(payload): Form<CredentialsPayload>,
) -> Response {
    match state.auth.login(&payload).await {
        Ok(session_id) => {
            // Never keep using a session id that existed before authentication.
            state.auth.logout(guard::session_id(&jar).as_deref());
            let jar = jar.add(session_cookie(session_id, state.auth.session_ttl()));
            (jar, Redirect::to("/")).into_response()
        }
        Err(err) => form_error(err, |message| state.views.login_page(message)),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    state.auth.logout(guard::session_id(&jar).as_deref());
    (jar.remove(expired_session_cookie()), Redirect::to("/login"))
}

/// Handler for the task list page.
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> AppResult<Html<String>> {
    let tasks = state.tasks.list(user.id).await?;
    Ok(Html(state.views.index_page(&user.username, &tasks, None)?))
}

/// Handler for creating a new task from the list page form.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(payload): Form<TaskPayload>,
) -> AppResult<Response> {
    match state.tasks.create(user.id, payload).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(message)) => {
            let tasks = state.tasks.list(user.id).await?;
            let page = state.views.index_page(&user.username, &tasks, Some(&message))?;
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(task_id): Path<TaskId>,
) -> AppResult<StatusCode> {
    state.tasks.toggle_completion(user.id, task_id).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(task_id): Path<TaskId>,
) -> AppResult<StatusCode> {
    state.tasks.delete(user.id, task_id).await?;
    Ok(StatusCode::OK)
}

pub async fn edit_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(task_id): Path<TaskId>,
    Form(payload): Form<TaskPayload>,
) -> AppResult<StatusCode> {
    state.tasks.update(user.id, task_id, payload).await?;
    Ok(StatusCode::OK)
}

/// Handler for `GET /api/stats`.
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> AppResult<Json<Stats>> {
    let stats = state.stats.summary(user.id).await?;
    Ok(Json(stats))
}
