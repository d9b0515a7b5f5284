use crate::client::FetchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("HTTP client setup failed: {0}")]
    ClientError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::UnknownTool(name) => {
                tracing::warn!(tool = %name, "Unknown tool requested");
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::ClientError(msg) => {
                tracing::error!(error = %msg, "HTTP client error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::ClientError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
