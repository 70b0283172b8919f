// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::guard;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Creates and configures the application router.
pub fn create_router(state: AppState) -> Router {
    // Everything in here sits behind the session guard.
    let protected = Router::new()
        .route("/", get(handlers::index))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/{id}/toggle", post(handlers::toggle_task))
        .route("/tasks/{id}/delete", post(handlers::delete_task))
        .route("/tasks/{id}/edit", post(handlers::edit_task))
        .route("/api/stats", get(handlers::stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_login,
        ));

    Router::new()
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        // Adds the shared services to the application state
        .with_state(state)
}
