//! Persistence seams.
//!
//! Handlers only see the two traits below. `PgStore` backs them with
//! PostgreSQL; `MemoryStore` keeps everything in process for tests and local
//! experiments. Both enforce the same rules: email uniqueness is settled by the
//! write itself, and every task operation is scoped to an owner.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Credential, Task, TaskInput, TaskQuery, TaskUpdate, UserId};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists a new credential.
    ///
    /// Fails with `AppError::DuplicateEmail` if the email is already taken.
    /// The check and the insert are one atomic step, so two concurrent calls
    /// with the same email never both succeed.
    async fn create(&self, email: &str, password_hash: &str) -> Result<Credential, AppError>;

    /// Looks up a credential by (normalized) email. `None` means not found.
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, AppError>;
}

/// Task persistence. Every method takes the owning subject; a task owned by
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks of `owner` matching `query`, newest first.
    async fn list(&self, owner: UserId, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn create(&self, owner: UserId, input: TaskInput) -> Result<Task, AppError>;

    async fn get(&self, owner: UserId, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Applies `changes` and returns the updated task, or `None` if `owner`
    /// has no task with this id.
    async fn update(
        &self,
        owner: UserId,
        id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was deleted.
    async fn delete(&self, owner: UserId, id: Uuid) -> Result<bool, AppError>;
}
