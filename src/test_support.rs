use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use tower::ServiceExt;

use crate::{
  app::create_app,
  email::{EmailProvider, MailError, Mailer, Message, ProviderError, SendReceipt},
  state::SharedAppState,
};

/// Mailer double that records every address it is asked to send for.
pub struct StubMailer {
  result: Result<(), MailError>,
  pub calls: Mutex<Vec<String>>,
}

impl StubMailer {
  pub fn succeeding() -> Arc<Self> {
    Arc::new(Self {
      result: Ok(()),
      calls: Mutex::new(Vec::new()),
    })
  }

  pub fn failing(err: MailError) -> Arc<Self> {
    Arc::new(Self {
      result: Err(err),
      calls: Mutex::new(Vec::new()),
    })
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl Mailer for StubMailer {
  async fn send(&self, email: &str) -> Result<(), MailError> {
    self.calls.lock().unwrap().push(email.to_string());
    self.result.clone()
  }
}

/// Provider double with a fixed outcome for recipient checks.
pub struct StubProvider {
  pub reject_recipient: Option<ProviderError>,
  pub sent: Mutex<Vec<Message>>,
}

impl StubProvider {
  pub fn accepting() -> Self {
    Self {
      reject_recipient: None,
      sent: Mutex::new(Vec::new()),
    }
  }

  pub fn rejecting(err: ProviderError) -> Self {
    Self {
      reject_recipient: Some(err),
      sent: Mutex::new(Vec::new()),
    }
  }
}

#[async_trait]
impl EmailProvider for StubProvider {
  async fn add_recipient(&self, message: &mut Message, recipient: &str) -> Result<(), ProviderError> {
    if let Some(err) = &self.reject_recipient {
      return Err(err.clone());
    }
    message.to.push(recipient.to_string());
    Ok(())
  }

  async fn send(&self, message: &Message) -> Result<SendReceipt, ProviderError> {
    self.sent.lock().unwrap().push(message.clone());
    Ok(SendReceipt::default())
  }
}

pub fn app_with_mailer(mailer: Arc<dyn Mailer>) -> Router {
  create_app(SharedAppState::new(mailer))
}

pub async fn send_request(app: Router, method: &str, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::empty())
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}
