// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

/// Identifier of a registered user.
pub type UserId = i64;

/// Identifier of a task.
pub type TaskId = i64;

/// A registered account.
///
/// Deliberately not `Serialize`: the password hash must never leave the server.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// How urgent a task is. Stored as lowercase text.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a task owned by a single user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    // Only the day matters for a deadline, so no timezone.
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    // `None` while the task is still open.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Form body shared by task creation and edition.
///
/// Missing fields fall back to their defaults so that an absent title is
/// reported as a validation error rather than a deserialization failure.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
}

/// Form body of the register and login pages.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CredentialsPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Number of tasks completed during one month.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MonthlyStat {
    /// Four digit year, e.g. `"2024"`.
    pub year: String,
    /// Zero padded month, e.g. `"03"`.
    pub month: String,
    pub count: i64,
}

/// Number of tasks completed during one year.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct YearlyStat {
    pub year: String,
    pub count: i64,
}

/// Body of `GET /api/stats`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub monthly: Vec<MonthlyStat>,
    pub yearly: Vec<YearlyStat>,
}

// HTML date inputs submit an empty string when left blank.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(de::Error::custom),
    }
}
