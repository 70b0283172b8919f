// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::{AppError, AppResult};

use anyhow::{Context, Result};
use common::User;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Persistence of accounts in the `users` table.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new account.
    ///
    /// Uniqueness is left to the `UNIQUE` constraint on `username`, so two
    /// concurrent registrations of the same name cannot both succeed.
    pub async fn insert(&self, username: &str, password_hash: &str) -> AppResult<User> {
        debug!("Inserting user: username={}", username);

        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                info!("User {} registered with ID: {}", username, id);
                Ok(User {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                info!("Username {} is already taken.", username);
                Err(AppError::Conflict)
            }
            Err(err) => Err(AppError::Storage(
                anyhow::Error::new(err).context("Failed to insert user into DB"),
            )),
        }
    }

    /// Looks an account up by its exact (case-sensitive) username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to look up user {}", username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::establish_connection_pool;

    async fn setup_store() -> (UserStore, SqlitePool) {
        let pool = establish_connection_pool("sqlite::memory:").await.unwrap();
        (UserStore::new(pool.clone()), pool)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (store, _pool) = setup_store().await;

        let user = store.insert("alice", "hash-a").await.unwrap();
        assert!(user.id > 0);

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let (store, pool) = setup_store().await;
        store.insert("alice", "hash-a").await.unwrap();

        let result = store.insert("alice", "hash-b").await;
        assert!(matches!(result, Err(AppError::Conflict)));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'alice'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let (store, _pool) = setup_store().await;
        store.insert("alice", "hash-a").await.unwrap();

        assert!(store.insert("Alice", "hash-b").await.is_ok());
        assert!(store.find_by_username("ALICE").await.unwrap().is_none());
    }
}
