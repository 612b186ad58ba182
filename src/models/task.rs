use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::UserId;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Done.
    Completed,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `pending` when omitted.
    #[serde(default)]
    pub status: TaskStatus,

    #[serde(alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

/// Partial update of a task. Absent fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[serde(alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    /// Owner of the task. All reads and writes are scoped by this field.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted when listing tasks.
/// The listing is always scoped to the authenticated user.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    /// Case-insensitive match against title or description.
    pub search: Option<String>,
}

impl Task {
    /// Creates a new task owned by `owner`, with a fresh UUID and both
    /// timestamps set to now.
    pub fn new(input: TaskInput, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `changes` and bumps `updated_at`.
    pub fn apply(&mut self, changes: &TaskUpdate) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
    }

    /// Whether this task passes the `status` and `search` filters of `query`.
    pub fn matches(&self, query: &TaskQuery) -> bool {
        if let Some(status) = query.status {
            if self.status != status {
                return false;
            }
        }
        match &query.search {
            Some(term) => {
                let term = term.to_lowercase();
                self.title.to_lowercase().contains(&term)
                    || self
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}
