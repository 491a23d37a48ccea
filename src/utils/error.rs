use axum::{
  http::{header, StatusCode},
  response::{IntoResponse, Response},
};

use crate::email::MailError;

/// Error returned by request handlers.
///
/// Rendered as the bare status code with `message` as a plain-text body.
#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    (
      self.status_code,
      [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
      self.message,
    )
      .into_response()
  }
}

impl From<AppError> for StatusCode {
  fn from(err: AppError) -> Self {
    err.status_code
  }
}

// Callers see the same 500 whatever went wrong; only the logs tell the kinds apart.
impl From<MailError> for AppError {
  fn from(error: MailError) -> Self {
    AppError::internal_server_error(error.to_string())
  }
}
