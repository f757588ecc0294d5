// bazaar/server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bazaar_flow::FlowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Cart empty")]
  EmptyCart,

  /// No session, or the session expired.
  #[error("Not authenticated")]
  Unauthenticated,

  /// Login with an unknown username or a wrong password.
  #[error("Authentication Failed: {0}")]
  Unauthorized(String),

  #[error("Forbidden")]
  Forbidden,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Message sent to the client. Server errors carry none.
  fn client_message(&self) -> Option<String> {
    match self {
      AppError::Validation(m) | AppError::Conflict(m) | AppError::Unauthorized(m) => Some(m.clone()),
      AppError::EmptyCart | AppError::Unauthenticated | AppError::Forbidden => Some(self.to_string()),
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => None,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Conflict(_) | AppError::EmptyCart => StatusCode::BAD_REQUEST,
      AppError::Unauthenticated | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden => StatusCode::FORBIDDEN,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    match self.client_message() {
      Some(message) => {
        tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with client error");
        HttpResponse::build(status).json(json!({ "message": message }))
      }
      None => {
        tracing::error!(application_error = %self, "Responding with server error");
        HttpResponse::build(status).finish()
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
