// storefront/src/telemetry.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` wins over the configured filter.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&config.log_filter))
    .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", config.log_filter, e)))?;

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  let installed = if config.log_json {
    builder.json().try_init()
  } else {
    builder.try_init()
  };
  installed.map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
