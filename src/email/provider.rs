use async_trait::async_trait;
use std::error::Error;

use super::types::{Message, SendReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
  Request(String),
  Api { status: u16, body: String },
  InvalidAddress(String),
  TooManyRecipients(usize),
  NoRecipients,
  Decode(String),
}

impl Error for ProviderError {}

impl std::fmt::Display for ProviderError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ProviderError::Request(msg) => write!(f, "request to provider failed: {}", msg),
      ProviderError::Api { status, body } => write!(f, "provider returned {}: {}", status, body),
      ProviderError::InvalidAddress(address) => write!(f, "address {} is not deliverable", address),
      ProviderError::TooManyRecipients(max) => write!(f, "message already has the maximum of {} recipients", max),
      ProviderError::NoRecipients => write!(f, "message has no recipients"),
      ProviderError::Decode(msg) => write!(f, "unexpected provider response: {}", msg),
    }
  }
}

impl From<reqwest::Error> for ProviderError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ProviderError::Decode(err.to_string())
    } else {
      ProviderError::Request(err.to_string())
    }
  }
}

/// The narrow slice of a transactional email service that registration needs.
///
/// Implementations must be usable from many request tasks at once.
#[async_trait]
pub trait EmailProvider: Send + Sync {
  /// Checks `recipient` with the provider and appends it to `message.to`.
  async fn add_recipient(&self, message: &mut Message, recipient: &str) -> Result<(), ProviderError>;

  /// Submits `message` for delivery.
  async fn send(&self, message: &Message) -> Result<SendReceipt, ProviderError>;
}
