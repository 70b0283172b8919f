// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::{AppError, AppResult};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::{Task, TaskId, TaskPayload, UserId};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Task persistence, always scoped to the owning user.
///
/// Every statement that reads or changes a task filters on `user_id` as well
/// as `id`, so a task belonging to somebody else simply does not match. The
/// mutating calls report how many rows they touched, but callers answer
/// success either way: nothing tells a user whether another user's task id
/// exists.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All tasks of `user_id`, newest first.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, title, due_date, priority, completed_at FROM tasks WHERE user_id = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to retrieve tasks of user ID: {}", user_id))?;

        debug!("Retrieved {} tasks for user ID: {}", tasks.len(), user_id);
        Ok(tasks)
    }

    /// Inserts a new open task.
    pub async fn create(&self, user_id: UserId, payload: TaskPayload) -> AppResult<Task> {
        let title = validated_title(&payload)?;

        debug!(
            "Insert values: user_id={}, title={}, due_date={:?}, priority={}",
            user_id, title, payload.due_date, payload.priority
        );

        let id = sqlx::query(
            "INSERT INTO tasks (user_id, title, due_date, priority, completed_at) VALUES (?, ?, ?, ?, NULL)",
        )
        .bind(user_id)
        .bind(&title)
        .bind(payload.due_date)
        .bind(payload.priority)
        .execute(&self.pool)
        .await
        .context("Failed to insert task into DB")?
        .last_insert_rowid();

        info!("Task created with ID: {} for user ID: {}", id, user_id);

        Ok(Task {
            id,
            user_id,
            title,
            due_date: payload.due_date,
            priority: payload.priority,
            completed_at: None,
        })
    }

    /// Marks an open task as done now, or reopens a done one.
    pub async fn toggle_completion(&self, user_id: UserId, task_id: TaskId) -> Result<u64> {
        self.toggle_completion_at(user_id, task_id, Utc::now()).await
    }

    /// Same as [`TaskStore::toggle_completion`] with an explicit completion instant.
    pub async fn toggle_completion_at(
        &self,
        user_id: UserId,
        task_id: TaskId,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE tasks
            SET completed_at = CASE WHEN completed_at IS NULL THEN ? ELSE NULL END
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(now)
        .bind(task_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to toggle task with ID: {}", task_id))?
        .rows_affected();

        info!(
            "Toggled {} rows for task ID: {} (user ID: {})",
            rows_affected, task_id, user_id
        );
        Ok(rows_affected)
    }

    /// Overwrites title, due date and priority. Completion is left alone.
    pub async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        payload: TaskPayload,
    ) -> AppResult<u64> {
        let title = validated_title(&payload)?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, due_date = ?, priority = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&title)
        .bind(payload.due_date)
        .bind(payload.priority)
        .bind(task_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update task with ID: {}", task_id))?
        .rows_affected();

        info!(
            "Updated {} rows for task ID: {} (user ID: {})",
            rows_affected, task_id, user_id
        );
        Ok(rows_affected)
    }

    pub async fn delete(&self, user_id: UserId, task_id: TaskId) -> Result<u64> {
        let rows_affected = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete task with ID: {}", task_id))?
            .rows_affected();

        info!(
            "Deleted {} rows for task ID: {} (user ID: {})",
            rows_affected, task_id, user_id
        );
        Ok(rows_affected)
    }
}

fn validated_title(payload: &TaskPayload) -> AppResult<String> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title cannot be empty."));
    }
    Ok(title.to_string())
}
