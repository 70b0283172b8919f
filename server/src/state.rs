// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth::AuthService;
use crate::config::validate_session_secret;
use crate::sessions::{DEFAULT_SESSION_TTL, SessionStore};
use crate::stats::StatsAggregator;
use crate::tasks::TaskStore;
use crate::users::UserStore;
use crate::views::Views;

use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// Services shared by every handler, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskStore,
    pub stats: StatsAggregator,
    pub views: Views,
    cookie_key: Key,
}

impl AppState {
    /// Wires the stores on top of `pool` with the default session lifetime.
    pub fn new(pool: SqlitePool, session_secret: &str) -> Result<Self> {
        Self::with_session_ttl(pool, session_secret, DEFAULT_SESSION_TTL)
    }

    /// Wires the stores on top of `pool` and derives the cookie signing key
    /// from `session_secret`.
    pub fn with_session_ttl(
        pool: SqlitePool,
        session_secret: &str,
        session_ttl: Duration,
    ) -> Result<Self> {
        // `Key::derive_from` panics on short key material.
        validate_session_secret(session_secret)?;

        let sessions = Arc::new(SessionStore::with_ttl(session_ttl));
        Ok(Self {
            auth: AuthService::new(UserStore::new(pool.clone()), sessions),
            tasks: TaskStore::new(pool.clone()),
            stats: StatsAggregator::new(pool),
            views: Views::new()?,
            cookie_key: Key::derive_from(session_secret.as_bytes()),
        })
    }
}

// Lets `SignedCookieJar` find its key in the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
