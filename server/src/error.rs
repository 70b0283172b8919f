// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors surfaced by the services to the HTTP layer.
///
/// Ownership mismatches on tasks are not errors at all: those operations
/// succeed without touching anything.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The username is already taken.
    #[error("Username already exists")]
    Conflict,

    /// Unknown username or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unexpected failure in the database, the password hasher or a page template.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user. Storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) => "An internal error occurred.".to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON rendering used by the AJAX endpoints.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if let AppError::Storage(err) = &self {
            tracing::error!("Internal server error: {:?}", err);
        } else {
            tracing::debug!(
                "Responding with error: status_code={}, message={}",
                code.as_u16(),
                self
            );
        }
        (
            code,
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("Title is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Storage(anyhow::anyhow!("disk full")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_are_not_public() {
        let err = AppError::Storage(anyhow::anyhow!("no such table: tasks"));
        assert_eq!(err.public_message(), "An internal error occurred.");
        assert_eq!(
            AppError::InvalidCredentials.public_message(),
            "Invalid credentials"
        );
    }
}
