use actix_web::error::BlockingError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),

    #[error("Malformed attachment blob: {0}")]
    MalformedBlob(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
            }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedBlob(_) => StatusCode::BAD_REQUEST,
            AppError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
