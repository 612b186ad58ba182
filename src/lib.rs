#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, token issuance and verification, the request"]
#![doc = "gate), persistence, task routes and error handling for the taskgate server."]
#![doc = "The binary (`main.rs`) reads the configuration, builds an `AppState` and serves"]
#![doc = "`routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
