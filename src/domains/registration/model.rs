use serde::Deserialize;

/// Path parameters of `POST /register/{email}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
  pub email: String,
}
