use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{CredentialStore, TaskStore};
use crate::error::AppError;
use crate::models::{Credential, Task, TaskInput, TaskQuery, TaskUpdate, UserId};

#[derive(Default)]
struct Users {
    next_id: UserId,
    by_email: HashMap<String, Credential>,
}

/// In-process store with the same semantics as `PgStore`.
///
/// Nothing survives a restart. Locks are never held across an `.await`.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Users>,
    tasks: Mutex<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::DatabaseError("in-memory store lock poisoned".into()))
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Credential, AppError> {
        let mut users = lock(&self.users)?;
        if users.by_email.contains_key(email) {
            return Err(AppError::DuplicateEmail);
        }

        users.next_id += 1;
        let credential = Credential {
            id: users.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users
            .by_email
            .insert(credential.email.clone(), credential.clone());
        Ok(credential)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, AppError> {
        Ok(lock(&self.users)?.by_email.get(email).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self, owner: UserId, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = lock(&self.tasks)?
            .values()
            .filter(|task| task.user_id == owner && task.matches(query))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create(&self, owner: UserId, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input, owner);
        lock(&self.tasks)?.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, owner: UserId, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(lock(&self.tasks)?
            .get(&id)
            .filter(|task| task.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: UserId,
        id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = lock(&self.tasks)?;
        match tasks.get_mut(&id).filter(|task| task.user_id == owner) {
            Some(task) => {
                task.apply(changes);
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, owner: UserId, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = lock(&self.tasks)?;
        let owned = tasks.get(&id).is_some_and(|task| task.user_id == owner);
        if owned {
            tasks.remove(&id);
        }
        Ok(owned)
    }
}
