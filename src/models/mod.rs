pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{Credential, PublicUser, UserId};
