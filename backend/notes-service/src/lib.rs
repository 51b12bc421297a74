/// Notes Service Library
///
/// A small note-taking backend: Google OAuth login issues a session token,
/// and the token gates per-user CRUD over posts.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for auth, posts, and health
/// - `models`: Data structures for users and posts
/// - `services`: Google OAuth flow orchestration
/// - `db`: Database access layer and repositories
/// - `middleware`: JWT authentication gate
/// - `security`: Token minting and validation
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
