use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
  config::Config,
  email::{Mailer, RegistrationMailer},
};

pub mod error;

pub const DEFAULT_LOG_FILTER: &str = "simple_reg=info,tower_http=info";

pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn init_mailer(config: &Config) -> Arc<dyn Mailer> {
  tracing::info!(
    "sending registrations for {} to {} via {}",
    config.domain,
    config.send_to,
    config.api_base
  );

  Arc::new(RegistrationMailer::mailgun(config))
}
