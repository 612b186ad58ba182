use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{CredentialStore, TaskStore};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Credential, Task, TaskInput, TaskQuery, TaskUpdate, UserId};

const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, user_id, created_at, updated_at";

/// PostgreSQL-backed implementation of both stores.
///
/// Email uniqueness relies on the `users_email_key` constraint from the
/// initial migration; there is no read-before-write.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized by `DATABASE_MAX_CONNECTIONS`.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the schema in `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escapes LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Credential, AppError> {
        sqlx::query_as::<_, Credential>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2)
             RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                AppError::DuplicateEmail
            }
            other => other.into(),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, AppError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credential)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list(&self, owner: UserId, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM tasks WHERE user_id = ", TASK_COLUMNS));
        builder.push_bind(owner);

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(search) = &query.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create(&self, owner: UserId, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input, owner);
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, due_date, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.user_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get(&self, owner: UserId, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        owner: UserId,
        id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 status = COALESCE($3, status),
                 due_date = COALESCE($4, due_date),
                 updated_at = NOW()
             WHERE id = $5 AND user_id = $6
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.due_date)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, owner: UserId, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
