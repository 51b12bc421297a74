use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// Token failures carry the exact wire messages the API contract promises;
/// everything else collapses to a generic 500 with detail kept in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    /// No usable bearer token on a protected request
    #[error("Missing token")]
    MissingToken,

    /// Bearer token present but unverifiable or expired
    #[error("Invalid token")]
    InvalidToken,

    /// Login handshake with the identity provider failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::OAuth(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::MissingToken | AppError::InvalidToken => self.to_string(),
            other => {
                tracing::error!("request failed: {}", other);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(status).json(serde_json::json!({ "message": message }))
    }
}

// actix-web provides a blanket From<T: ResponseError> for actix_web::Error,
// so AppError can cross middleware boundaries without a manual impl.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_contract_statuses() {
        assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_errors_map_to_500() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_wire_messages() {
        assert_eq!(AppError::MissingToken.to_string(), "Missing token");
        assert_eq!(AppError::InvalidToken.to_string(), "Invalid token");
    }
}
