use std::sync::Arc;

use crate::email::Mailer;

#[derive(Clone)]
pub struct SharedAppState {
  pub mailer: Arc<dyn Mailer>,
}

impl SharedAppState {
  pub fn new(mailer: Arc<dyn Mailer>) -> Self {
    Self { mailer }
  }
}
