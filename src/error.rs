use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid wizard transition: {0}")]
    InvalidTransition(String),

    #[error("Assessment {0} has no schedule")]
    MissingSchedule(uuid::Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Names of every field carried by a validation failure, sorted.
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            Error::Validation(errors) => {
                let mut fields: Vec<String> =
                    errors.errors().keys().map(|k| k.to_string()).collect();
                fields.sort();
                fields
            }
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Error::Validation(ref errors) = self {
            let body = Json(json!({
                "error": "validation_failed",
                "fields": errors,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::InvalidTransition(msg) => (StatusCode::CONFLICT, msg),
            Error::MissingSchedule(id) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Assessment {} has no schedule", id),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
