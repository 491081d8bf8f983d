use std::io::Error as IoError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Startup failures; any of these stops the process
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(#[from] statusboard_service::config::Error),
    #[error("Database error: {0:#}")]
    Database(anyhow::Error),
    #[error("Checker error: {0:#}")]
    Checker(anyhow::Error),
}

/// Errors returned by the HTTP handlers. Messages are generic; details go to
/// the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
