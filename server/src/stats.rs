// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use common::{MonthlyStat, Stats, UserId, YearlyStat};
use sqlx::SqlitePool;

/// Completion counts computed on demand from the `tasks` table.
#[derive(Clone)]
pub struct StatsAggregator {
    pool: SqlitePool,
}

impl StatsAggregator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Completed tasks per (year, month), oldest first.
    pub async fn monthly(&self, user_id: UserId) -> Result<Vec<MonthlyStat>> {
        sqlx::query_as::<_, MonthlyStat>(
            r#"
            SELECT
                strftime('%Y', completed_at) AS year,
                strftime('%m', completed_at) AS month,
                COUNT(*) AS count
            FROM tasks
            WHERE completed_at IS NOT NULL AND user_id = ?
            GROUP BY year, month
            ORDER BY year, month
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to compute monthly stats")
    }

    /// Completed tasks per year, oldest first.
    pub async fn yearly(&self, user_id: UserId) -> Result<Vec<YearlyStat>> {
        sqlx::query_as::<_, YearlyStat>(
            r#"
            SELECT
                strftime('%Y', completed_at) AS year,
                COUNT(*) AS count
            FROM tasks
            WHERE completed_at IS NOT NULL AND user_id = ?
            GROUP BY year
            ORDER BY year
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to compute yearly stats")
    }

    pub async fn summary(&self, user_id: UserId) -> Result<Stats> {
        Ok(Stats {
            monthly: self.monthly(user_id).await?,
            yearly: self.yearly(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::establish_connection_pool;
    use crate::tasks::TaskStore;
    use chrono::{TimeZone, Utc};
    use common::TaskPayload;

    async fn setup() -> (TaskStore, StatsAggregator) {
        let pool = establish_connection_pool("sqlite::memory:").await.unwrap();
        for username in ["alice", "bob"] {
            sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, 'x')")
                .bind(username)
                .execute(&pool)
                .await
                .unwrap();
        }
        (TaskStore::new(pool.clone()), StatsAggregator::new(pool))
    }

    async fn complete_task(store: &TaskStore, user_id: UserId, y: i32, m: u32, d: u32) {
        let task = store
            .create(
                user_id,
                TaskPayload {
                    title: format!("Done on {}-{}-{}", y, m, d),
                    ..TaskPayload::default()
                },
            )
            .await
            .unwrap();
        let at = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        store.toggle_completion_at(user_id, task.id, at).await.unwrap();
    }

    #[tokio::test]
    async fn test_counts_by_month_and_year() {
        let (store, stats) = setup().await;
        for day in [1, 10, 31] {
            complete_task(&store, 1, 2024, 3, day).await;
        }
        complete_task(&store, 1, 2023, 11, 5).await;
        complete_task(&store, 1, 2023, 12, 24).await;
        // Open tasks and other users' tasks do not count.
        store
            .create(1, TaskPayload { title: "Open".to_string(), ..TaskPayload::default() })
            .await
            .unwrap();
        complete_task(&store, 2, 2024, 3, 2).await;

        let summary = stats.summary(1).await.unwrap();

        assert_eq!(
            summary.monthly,
            vec![
                MonthlyStat { year: "2023".to_string(), month: "11".to_string(), count: 1 },
                MonthlyStat { year: "2023".to_string(), month: "12".to_string(), count: 1 },
                MonthlyStat { year: "2024".to_string(), month: "03".to_string(), count: 3 },
            ]
        );
        assert_eq!(
            summary.yearly,
            vec![
                YearlyStat { year: "2023".to_string(), count: 2 },
                YearlyStat { year: "2024".to_string(), count: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_reopened_tasks_drop_out() {
        let (store, stats) = setup().await;
        complete_task(&store, 1, 2024, 5, 1).await;
        let tasks = store.list(1).await.unwrap();
        store.toggle_completion(1, tasks[0].id).await.unwrap();

        assert!(stats.monthly(1).await.unwrap().is_empty());
        assert!(stats.yearly(1).await.unwrap().is_empty());
    }
}
