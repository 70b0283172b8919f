// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::{AppError, AppResult};
use crate::sessions::{SessionStore, SessionUser};
use crate::users::UserStore;

use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use common::{CredentialsPayload, User};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Hash a password using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Failed to verify password: {}", e)),
    }
}

/// Registration, login and logout.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(users: UserStore, sessions: Arc<SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Creates an account. The caller is expected to send the user to the
    /// login page afterwards; no session is opened here.
    pub async fn register(&self, payload: &CredentialsPayload) -> AppResult<User> {
        let username = payload.username.trim();
        if username.is_empty() || payload.password.is_empty() {
            return Err(AppError::validation("All fields required"));
        }

        let password = payload.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task failed")??;

        self.users.insert(username, &password_hash).await
    }

    /// Checks the credentials and opens a session. Returns the session id.
    pub async fn login(&self, payload: &CredentialsPayload) -> AppResult<String> {
        let username = payload.username.trim();
        debug!("Login attempt for username: {}", username);

        let Some(user) = self.users.find_by_username(username).await? else {
            info!("Login rejected: unknown username {}", username);
            return Err(AppError::InvalidCredentials);
        };

        let password = payload.password.clone();
        let stored_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .context("Password verification task failed")??;

        if !verified {
            info!("Login rejected: wrong password for {}", username);
            return Err(AppError::InvalidCredentials);
        }

        let session_id = self.sessions.create(SessionUser {
            id: user.id,
            username: user.username,
        });
        info!("User ID {} logged in.", user.id);
        Ok(session_id)
    }

    /// Destroys the session, whether or not it still exists.
    pub fn logout(&self, session_id: Option<&str>) {
        if let Some(session_id) = session_id {
            self.sessions.destroy(session_id);
        }
    }

    /// Resolves the user bound to a session id, if any.
    pub fn current_user(&self, session_id: &str) -> Option<SessionUser> {
        self.sessions.get(session_id)
    }

    /// How long a session opened by [`login`](Self::login) stays valid.
    pub fn session_ttl(&self) -> Duration {
        self.sessions.ttl()
    }
}
