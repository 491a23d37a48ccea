use async_trait::async_trait;
use std::error::Error;

use super::{
  mailgun::MailgunClient,
  provider::{EmailProvider, ProviderError},
  types::Message,
};
use crate::config::Config;

pub const FROM_DISPLAY_NAME: &str = "Registration";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
  RecipientRejected { recipient: String, cause: ProviderError },
  DeliveryFailed { recipient: String, cause: ProviderError },
}

impl Error for MailError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      MailError::RecipientRejected { cause, .. } | MailError::DeliveryFailed { cause, .. } => Some(cause),
    }
  }
}

impl std::fmt::Display for MailError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MailError::RecipientRejected { recipient, cause } => {
        write!(f, "failed to add recipient {:?}: {}", recipient, cause)
      }
      MailError::DeliveryFailed { recipient, cause } => {
        write!(f, "failed to send to recipient {:?}: {}", recipient, cause)
      }
    }
  }
}

#[async_trait]
pub trait Mailer: Send + Sync {
  /// Notifies the configured recipient that `email` registered.
  async fn send(&self, email: &str) -> Result<(), MailError>;
}

pub struct RegistrationMailer<P> {
  provider: P,
  subject: String,
  send_to: String,
  sender: String,
}

impl<P> RegistrationMailer<P>
where
  P: EmailProvider,
{
  pub fn new(provider: P, subject: String, send_to: String, sender: String) -> Self {
    Self {
      provider,
      subject,
      send_to,
      sender,
    }
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }

  /// The body is the submitted address itself; there is no template.
  pub fn build_message(&self, email: &str) -> Message {
    Message::new(
      format!("{} <{}>", FROM_DISPLAY_NAME, self.sender),
      self.subject.clone(),
      email.to_string(),
    )
  }
}

impl RegistrationMailer<MailgunClient> {
  pub fn mailgun(config: &Config) -> Self {
    let client = MailgunClient::new(&config.domain, &config.api_key, &config.pub_key).with_api_base(&config.api_base);

    Self::new(
      client,
      config.subject.clone(),
      config.send_to.clone(),
      config.sender.clone(),
    )
  }
}

#[async_trait]
impl<P> Mailer for RegistrationMailer<P>
where
  P: EmailProvider,
{
  async fn send(&self, email: &str) -> Result<(), MailError> {
    let mut message = self.build_message(email);

    if let Err(cause) = self.provider.add_recipient(&mut message, &self.send_to).await {
      tracing::error!("failed to add recipient {:?}: {}", self.send_to, cause);
      return Err(MailError::RecipientRejected {
        recipient: self.send_to.clone(),
        cause,
      });
    }

    match self.provider.send(&message).await {
      Ok(receipt) => {
        tracing::debug!("mailgun accepted {} ({})", receipt.id, receipt.message);
      }
      Err(cause) => {
        tracing::error!("failed to send to recipient {:?}: {}", self.send_to, cause);
        return Err(MailError::DeliveryFailed {
          recipient: self.send_to.clone(),
          cause,
        });
      }
    }

    tracing::info!("registered user {:?} OK", email);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::email::SendReceipt;
  use mockall::predicate;

  mockall::mock! {
      Provider {}

      #[async_trait]
      impl EmailProvider for Provider {
          async fn add_recipient(&self, message: &mut Message, recipient: &str) -> Result<(), ProviderError>;
          async fn send(&self, message: &Message) -> Result<SendReceipt, ProviderError>;
      }
  }

  fn mailer(provider: MockProvider) -> RegistrationMailer<MockProvider> {
    RegistrationMailer::new(
      provider,
      "Registration".to_string(),
      "admin@example.com".to_string(),
      "noreply@example.com".to_string(),
    )
  }

  #[test]
  fn test_build_message() {
    let message = mailer(MockProvider::new()).build_message("user@example.com");

    assert_eq!(message.from, "Registration <noreply@example.com>");
    assert_eq!(message.subject, "Registration");
    assert_eq!(message.body, "user@example.com");
    assert!(message.to.is_empty());
  }

  #[tokio::test]
  async fn test_send_success() {
    let mut provider = MockProvider::new();
    provider
      .expect_add_recipient()
      .with(predicate::always(), predicate::eq("admin@example.com"))
      .times(1)
      .returning(|message, recipient| {
        message.to.push(recipient.to_string());
        Ok(())
      });
    provider
      .expect_send()
      .withf(|message: &Message| {
        message.body == "user@example.com"
          && message.to == vec!["admin@example.com".to_string()]
          && message.from == "Registration <noreply@example.com>"
          && message.subject == "Registration"
      })
      .times(1)
      .returning(|_| {
        Ok(SendReceipt {
          id: "<1@mg.example.com>".to_string(),
          message: "Queued. Thank you.".to_string(),
        })
      });

    let result = mailer(provider).send("user@example.com").await;
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn test_send_recipient_rejected_skips_delivery() {
    let mut provider = MockProvider::new();
    provider
      .expect_add_recipient()
      .times(1)
      .returning(|_, recipient| Err(ProviderError::InvalidAddress(recipient.to_string())));
    provider.expect_send().times(0);

    let err = mailer(provider).send("user@example.com").await.unwrap_err();
    match &err {
      MailError::RecipientRejected { recipient, cause } => {
        assert_eq!(recipient, "admin@example.com");
        assert_eq!(cause, &ProviderError::InvalidAddress("admin@example.com".to_string()));
      }
      _ => panic!("Expected RecipientRejected error"),
    }
    assert_eq!(
      err.to_string(),
      "failed to add recipient \"admin@example.com\": address admin@example.com is not deliverable"
    );
  }

  #[tokio::test]
  async fn test_send_delivery_failed() {
    let mut provider = MockProvider::new();
    provider.expect_add_recipient().times(1).returning(|message, recipient| {
      message.to.push(recipient.to_string());
      Ok(())
    });
    provider.expect_send().times(1).returning(|_| {
      Err(ProviderError::Api {
        status: 500,
        body: "internal".to_string(),
      })
    });

    let err = mailer(provider).send("user@example.com").await.unwrap_err();
    match err {
      MailError::DeliveryFailed { recipient, .. } => assert_eq!(recipient, "admin@example.com"),
      _ => panic!("Expected DeliveryFailed error"),
    }
  }

  #[tokio::test]
  async fn test_send_twice_delivers_twice() {
    let mut provider = MockProvider::new();
    provider.expect_add_recipient().times(2).returning(|message, recipient| {
      message.to.push(recipient.to_string());
      Ok(())
    });
    provider.expect_send().times(2).returning(|_| Ok(SendReceipt::default()));

    let mailer = mailer(provider);
    mailer.send("user@example.com").await.unwrap();
    mailer.send("user@example.com").await.unwrap();
  }

  #[test]
  fn test_mailgun_mailer_from_config() {
    let config = Config {
      domain: "mg.example.com".to_string(),
      api_key: "key".to_string(),
      pub_key: "pub".to_string(),
      send_to: "admin@example.com".to_string(),
      sender: "noreply@example.com".to_string(),
      subject: "Welcome".to_string(),
      port: 24000,
      api_base: "http://localhost:9999/v3".to_string(),
    };

    let mailer = RegistrationMailer::mailgun(&config);
    assert_eq!(mailer.provider.domain(), "mg.example.com");
    assert_eq!(mailer.provider.api_base(), "http://localhost:9999/v3");

    let message = mailer.build_message("user@example.com");
    assert_eq!(message.subject, "Welcome");
    assert_eq!(message.from, "Registration <noreply@example.com>");
  }
}
