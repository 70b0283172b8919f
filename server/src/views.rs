// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Server-rendered pages.
//!
//! The templates live in `server/templates/` and are compiled into the binary.
//! Their names end in `.html`, so tera escapes every interpolated value.
use anyhow::{Context, Result};
use common::{Priority, Task, TaskId};
use serde::Serialize;
use std::sync::Arc;
use tera::Tera;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("index.html", include_str!("../templates/index.html")),
];

#[derive(Serialize)]
struct FormPage<'a> {
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct IndexPage<'a> {
    username: &'a str,
    error: Option<&'a str>,
    priorities: [Priority; 3],
    default_priority: Priority,
    tasks: Vec<TaskView<'a>>,
}

/// A task with its dates already formatted for display.
#[derive(Serialize)]
struct TaskView<'a> {
    id: TaskId,
    title: &'a str,
    due: String,
    priority: Priority,
    completed: bool,
    completed_on: Option<String>,
}

impl<'a> From<&'a Task> for TaskView<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id,
            title: &task.title,
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            completed: task.is_completed(),
            completed_on: task
                .completed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

/// The parsed page templates, shared by every handler.
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .context("Failed to parse page templates")?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    fn render<T: Serialize>(&self, name: &str, page: &T) -> Result<String> {
        let context = tera::Context::from_serialize(page)
            .with_context(|| format!("Failed to build the context for {}", name))?;
        self.tera
            .render(name, &context)
            .with_context(|| format!("Failed to render {}", name))
    }

    pub fn register_page(&self, error: Option<&str>) -> Result<String> {
        self.render("register.html", &FormPage { error })
    }

    pub fn login_page(&self, error: Option<&str>) -> Result<String> {
        self.render("login.html", &FormPage { error })
    }

    /// The task list of the logged-in user, with the creation form and stats.
    pub fn index_page(&self, username: &str, tasks: &[Task], error: Option<&str>) -> Result<String> {
        let page = IndexPage {
            username,
            error,
            priorities: Priority::ALL,
            default_priority: Priority::default(),
            tasks: tasks.iter().map(TaskView::from).collect(),
        };
        self.render("index.html", &page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(title: &str) -> Task {
        Task {
            id: 7,
            user_id: 1,
            title: title.to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            priority: Priority::High,
            completed_at: None,
        }
    }

    #[test]
    fn test_index_escapes_user_text() {
        let views = Views::new().unwrap();
        let page = views
            .index_page("<i>alice</i>", &[task("<b>bold</b> & \"quoted\"")], None)
            .unwrap();

        assert!(page.contains("&lt;b&gt;bold"));
        assert!(page.contains("&amp; &quot;quoted&quot;"));
        assert!(page.contains("&lt;i&gt;alice"));
        assert!(!page.contains("<b>bold</b>"));
        assert!(!page.contains("<i>alice</i>"));
    }

    #[test]
    fn test_index_renders_task_fields() {
        let views = Views::new().unwrap();
        let page = views.index_page("alice", &[task("Buy milk")], None).unwrap();

        assert!(page.contains(r#"id="task-7""#));
        assert!(page.contains(r#"class="task" data-title="Buy milk""#));
        assert!(page.contains(r#"data-priority="high""#));
        assert!(page.contains("due 2024-03-15"));
        assert!(page.contains(r#"<option value="high" selected>high</option>"#));
        assert!(page.contains("Logged in as <strong>alice</strong>"));
        assert!(!page.contains("No tasks yet."));
    }

    #[test]
    fn test_completed_task_is_marked_done() {
        let views = Views::new().unwrap();
        let mut done = task("Ship it");
        done.completed_at = Some(Utc.with_ymd_and_hms(2024, 3, 20, 9, 30, 0).unwrap());

        let page = views.index_page("alice", &[done], None).unwrap();

        assert!(page.contains(r#"class="task done""#));
        assert!(page.contains(" checked>"));
        assert!(page.contains("<small>done 2024-03-20 09:30</small>"));
    }

    #[test]
    fn test_empty_index() {
        let views = Views::new().unwrap();
        let page = views
            .index_page("alice", &[], Some("Title cannot be empty."))
            .unwrap();

        assert!(page.contains("No tasks yet."));
        assert!(page.contains(r#"<p class="error">Title cannot be empty.</p>"#));
        // The creation form defaults to medium.
        assert!(page.contains(r#"<option value="medium" selected>medium</option>"#));
    }

    #[test]
    fn test_forms_show_errors() {
        let views = Views::new().unwrap();

        assert!(
            views
                .register_page(Some("Username already exists"))
                .unwrap()
                .contains(r#"<p class="error">Username already exists</p>"#)
        );
        let login = views.login_page(None).unwrap();
        assert!(login.contains(r#"action="/login""#));
        assert!(login.contains("<title>Login - TaskFlow</title>"));
        assert!(!login.contains("class=\"error\""));
    }
}
