//! HTTP mapping for `AppError`.
//!
//! Every handler returns `Result<_, ApiError>`; the wrapper picks the status
//! code and serializes the error as `{"message": "..."}` — the body shape
//! the gallery page expects.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use pw_core::error::AppError;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(msg) = &self.0 {
            log::error!("internal error: {}", msg);
        }
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}
