use std::fmt;

use clap::{Args, Parser};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 24000;
pub const DEFAULT_SUBJECT: &str = "Registration";
pub const DEFAULT_API_BASE: &str = "https://api.mailgun.net/v3";

/// Command line of the `simple-reg` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "simple-reg", about = "Sends a registration notice for every POST /register/{email}")]
pub struct Cli {
  /// The config to use (empty for none)
  #[arg(long, env = "SIMPLE_REG_CONFIG", default_value = "config.toml")]
  pub config: String,

  #[command(flatten)]
  pub overrides: Overrides,
}

/// Values supplied outside the config file.
///
/// They fill in whatever the file leaves empty, except for `port`, where a
/// non-zero override always wins.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
  /// The domain to send from
  #[arg(long, env = "SIMPLE_REG_DOMAIN", default_value = "")]
  pub domain: String,

  /// The API key to use
  #[arg(long = "api-key", env = "SIMPLE_REG_API_KEY", default_value = "", hide_env_values = true)]
  pub api_key: String,

  /// The public API key to use
  #[arg(long = "pub-key", env = "SIMPLE_REG_PUB_KEY", default_value = "", hide_env_values = true)]
  pub pub_key: String,

  /// The email address to send to
  #[arg(long = "send-to", env = "SIMPLE_REG_SEND_TO", default_value = "")]
  pub send_to: String,

  /// The email address to send from
  #[arg(long, env = "SIMPLE_REG_SENDER", default_value = "")]
  pub sender: String,

  /// Subject
  #[arg(long, env = "SIMPLE_REG_SUBJECT", default_value = DEFAULT_SUBJECT)]
  pub subject: String,

  /// The port to listen on (0 leaves it to the config file)
  #[arg(long, env = "SIMPLE_REG_PORT", default_value_t = 0)]
  pub port: u16,

  /// Base URL of the Mailgun API
  #[arg(long = "api-base", env = "SIMPLE_REG_API_BASE", default_value = "")]
  pub api_base: String,
}

/// Shape of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
  domain: String,
  #[serde(rename = "api-key")]
  api_key: String,
  #[serde(rename = "pub-key")]
  pub_key: String,
  #[serde(rename = "send-to")]
  send_to: String,
  sender: String,
  subject: String,
  port: u16,
  #[serde(rename = "api-base")]
  api_base: String,
}

impl FileSettings {
  /// Reads exactly `path`; no extension is guessed and value types must match.
  fn load(path: &str) -> Result<Self, ConfigError> {
    let parse_failure = |cause: String| ConfigError::ParseFailure {
      path: path.to_string(),
      cause,
    };

    let contents = std::fs::read_to_string(path).map_err(|err| parse_failure(err.to_string()))?;
    toml::from_str::<FileSettings>(&contents).map_err(|err| parse_failure(err.to_string()))
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
  pub domain: String,
  pub api_key: String,
  pub pub_key: String,
  pub send_to: String,
  pub sender: String,
  pub subject: String,
  pub port: u16,
  pub api_base: String,
}

impl fmt::Debug for Config {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Config")
      .field("domain", &self.domain)
      .field("api_key", &"[redacted]")
      .field("pub_key", &"[redacted]")
      .field("send_to", &self.send_to)
      .field("sender", &self.sender)
      .field("subject", &self.subject)
      .field("port", &self.port)
      .field("api_base", &self.api_base)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  ParseFailure { path: String, cause: String },
  MissingField { field: &'static str },
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ParseFailure { path, cause } => write!(f, "failed to parse config {}: {}", path, cause),
      ConfigError::MissingField { field } => write!(f, "must define a value for flag {}", field),
    }
  }
}

/// Merges the optional config file at `file_path` with `overrides`.
///
/// An empty `file_path` skips the file entirely. Mandatory fields are checked
/// in a fixed order and the first one missing from both sources is reported.
pub fn resolve(file_path: &str, overrides: &Overrides) -> Result<Config, ConfigError> {
  let file = if file_path.is_empty() {
    FileSettings::default()
  } else {
    FileSettings::load(file_path)?
  };

  let domain = mandatory("domain", file.domain, &overrides.domain)?;
  let api_key = mandatory("api-key", file.api_key, &overrides.api_key)?;
  let pub_key = mandatory("pub-key", file.pub_key, &overrides.pub_key)?;
  let send_to = mandatory("send-to", file.send_to, &overrides.send_to)?;
  let sender = mandatory("sender", file.sender, &overrides.sender)?;

  let subject = first_non_empty(file.subject, &overrides.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

  let port = match (overrides.port, file.port) {
    (0, 0) => DEFAULT_PORT,
    (0, from_file) => from_file,
    (from_override, _) => from_override,
  };

  let api_base = first_non_empty(file.api_base, &overrides.api_base)
    .map(|base| base.trim_end_matches('/').to_string())
    .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

  Ok(Config {
    domain,
    api_key,
    pub_key,
    send_to,
    sender,
    subject,
    port,
    api_base,
  })
}

fn mandatory(field: &'static str, from_file: String, from_override: &str) -> Result<String, ConfigError> {
  first_non_empty(from_file, from_override).ok_or(ConfigError::MissingField { field })
}

fn first_non_empty(from_file: String, from_override: &str) -> Option<String> {
  if !from_file.is_empty() {
    Some(from_file)
  } else if !from_override.is_empty() {
    Some(from_override.to_string())
  } else {
    None
  }
}
