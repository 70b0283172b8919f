// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use common::UserId;
use parking_lot::RwLock;
use tracing::debug;

const SESSION_ID_BYTES: usize = 32;

/// How long a session stays valid after login.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The account a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
}

struct Session {
    user: SessionUser,
    opened_at: Instant,
}

impl Session {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.opened_at.elapsed() >= ttl
    }
}

/// Server-side sessions, keyed by an unguessable random id.
///
/// Lives in the application state; nothing here is global. Locks are only
/// held for the duration of a map operation, never across an `.await`.
/// A session older than the store's TTL is treated as absent and is dropped
/// the next time a session is opened.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens a new session for `user` and returns its id.
    pub fn create(&self, user: SessionUser) -> String {
        let session_id = generate_session_id();
        debug!("Opening session for user ID: {}", user.id);

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(
            session_id.clone(),
            Session {
                user,
                opened_at: Instant::now(),
            },
        );
        session_id
    }

    /// Resolves a session id to the user it belongs to, unless it has expired.
    pub fn get(&self, session_id: &str) -> Option<SessionUser> {
        self.sessions
            .read()
            .get(session_id)
            .filter(|session| !session.is_expired(self.ttl))
            .map(|session| session.user.clone())
    }

    /// Drops a session. Unknown ids are ignored.
    pub fn destroy(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id);
        if let Some(session) = &removed {
            debug!("Closed session for user ID: {}", session.user.id);
        }
        removed.is_some()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
