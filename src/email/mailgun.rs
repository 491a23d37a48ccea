use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;

use super::{
  provider::{EmailProvider, ProviderError},
  types::{Message, SendReceipt},
};
use crate::config::DEFAULT_API_BASE;

/// Mailgun refuses batches larger than this.
pub const MAX_RECIPIENTS: usize = 1000;

#[derive(Debug, Deserialize)]
struct ValidationResponse {
  is_valid: bool,
  #[serde(default)]
  did_you_mean: Option<String>,
}

/// Mailgun HTTP API client.
///
/// No request timeout is configured, so a stalled Mailgun connection holds the
/// calling task until the OS gives up on the socket.
pub struct MailgunClient {
  http: reqwest::Client,
  api_base: String,
  domain: String,
  api_key: String,
  pub_key: String,
}

impl MailgunClient {
  pub fn new(domain: impl Into<String>, api_key: impl Into<String>, pub_key: impl Into<String>) -> Self {
    MailgunClient {
      http: reqwest::Client::new(),
      api_base: DEFAULT_API_BASE.to_string(),
      domain: domain.into(),
      api_key: api_key.into(),
      pub_key: pub_key.into(),
    }
  }

  pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
    self.api_base = api_base.into().trim_end_matches('/').to_string();
    self
  }

  pub fn domain(&self) -> &str {
    &self.domain
  }

  pub fn api_base(&self) -> &str {
    &self.api_base
  }
}

async fn ensure_success(res: Response) -> Result<Response, ProviderError> {
  let status = res.status();
  if status.is_success() {
    return Ok(res);
  }

  let body = res.text().await.unwrap_or_default();
  Err(ProviderError::Api {
    status: status.as_u16(),
    body,
  })
}

#[async_trait]
impl EmailProvider for MailgunClient {
  async fn add_recipient(&self, message: &mut Message, recipient: &str) -> Result<(), ProviderError> {
    if message.to.len() >= MAX_RECIPIENTS {
      return Err(ProviderError::TooManyRecipients(MAX_RECIPIENTS));
    }

    let res = self
      .http
      .get(format!("{}/address/validate", self.api_base))
      .basic_auth("api", Some(&self.pub_key))
      .query(&[("address", recipient)])
      .send()
      .await?;

    let validation: ValidationResponse = ensure_success(res).await?.json().await?;
    if !validation.is_valid {
      if let Some(suggestion) = validation.did_you_mean {
        tracing::debug!("mailgun suggests {:?} instead of {:?}", suggestion, recipient);
      }
      return Err(ProviderError::InvalidAddress(recipient.to_string()));
    }

    message.to.push(recipient.to_string());
    Ok(())
  }

  async fn send(&self, message: &Message) -> Result<SendReceipt, ProviderError> {
    if message.to.is_empty() {
      return Err(ProviderError::NoRecipients);
    }

    let mut form: Vec<(&str, &str)> = vec![
      ("from", message.from.as_str()),
      ("subject", message.subject.as_str()),
      ("text", message.body.as_str()),
    ];
    form.extend(message.to.iter().map(|to| ("to", to.as_str())));

    let res = self
      .http
      .post(format!("{}/{}/messages", self.api_base, self.domain))
      .basic_auth("api", Some(&self.api_key))
      .form(&form)
      .send()
      .await?;

    let receipt: SendReceipt = ensure_success(res).await?.json().await?;
    Ok(receipt)
  }
}
