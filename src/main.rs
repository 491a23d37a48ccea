use clap::Parser;
use tokio::signal;

use dotenvy::dotenv;

use simple_reg::app::create_app;
use simple_reg::config::{resolve, Cli};
use simple_reg::state::SharedAppState;
use simple_reg::utils::{init_mailer, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  init_tracing();

  let cli = Cli::parse();
  let config = resolve(&cli.config, &cli.overrides)?;

  let mailer = init_mailer(&config);
  let app = create_app(SharedAppState::new(mailer));

  let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

  tracing::info!("Simple Reg listening on port :{}", config.port);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = signal::ctrl_c().await {
      tracing::error!("failed to install Ctrl+C handler: {}", err);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(err) => {
        tracing::error!("failed to install SIGTERM handler: {}", err);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
