//! Registration email delivery.
//!
//! `Mailer` is what request handlers talk to. It builds the notification and
//! hands it to an `EmailProvider`, which for production is Mailgun's HTTP API.

mod mailgun;
mod provider;
mod service;
mod types;

pub use mailgun::{MailgunClient, MAX_RECIPIENTS};
pub use provider::{EmailProvider, ProviderError};
pub use service::{MailError, Mailer, RegistrationMailer, FROM_DISPLAY_NAME};
pub use types::{Message, SendReceipt};
