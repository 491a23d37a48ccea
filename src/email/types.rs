use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub from: String,
  pub to: Vec<String>,
  pub subject: String,
  pub body: String,
}

impl Message {
  /// Creates a message with no recipients yet.
  pub fn new(from: String, subject: String, body: String) -> Self {
    Message {
      from,
      to: Vec::new(),
      subject,
      body,
    }
  }
}

/// What the provider hands back once a message is accepted for delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub message: String,
}
