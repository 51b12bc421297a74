/// HTTP handlers grouped by concern
pub mod auth;
pub mod health;
pub mod posts;
