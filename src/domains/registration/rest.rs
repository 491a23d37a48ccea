use axum::{
  extract::{Path, State},
  http::StatusCode,
  routing::{post, Router},
};

use super::model::RegistrationRequest;
use crate::{state::SharedAppState, utils::error::AppError};

pub fn registration_routes() -> Router<SharedAppState> {
  Router::new().route("/register/{email}", post(register_handler))
}

/// `email` arrives percent-decoded and is passed on without any validation.
pub async fn register_handler(
  State(state): State<SharedAppState>,
  Path(request): Path<RegistrationRequest>,
) -> Result<StatusCode, AppError> {
  state.mailer.send(&request.email).await?;
  Ok(StatusCode::OK)
}
