//! Player-facing account and wallet layer of an online casino lobby, backed by
//! a hosted Postgres table API with auth and object storage.

pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod state;

pub use errors::{AppError, Result};
pub use state::AppState;
