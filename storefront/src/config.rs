// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  /// ISO 4217 code used when rendering amounts.
  pub currency_code: String,
  /// Default tracing filter; `RUST_LOG` overrides it.
  pub log_filter: String,
  pub log_json: bool,
  /// JSON list of products loaded into the in-memory catalog at startup.
  pub seed_catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      currency_code: "PHP".to_string(),
      log_filter: "info".to_string(),
      log_json: false,
      seed_catalog_path: None,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any key lookup; unset keys take their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();
    let get = |var_name: &str| lookup(var_name).filter(|v| !v.trim().is_empty());

    let currency_code = get("MARIVOR_CURRENCY")
      .map(|v| v.trim().to_ascii_uppercase())
      .unwrap_or(defaults.currency_code);
    if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Config(format!(
        "Invalid MARIVOR_CURRENCY '{}': expected a three-letter code",
        currency_code
      )));
    }

    let log_filter = get("MARIVOR_LOG_FILTER").unwrap_or(defaults.log_filter);

    let log_json = match get("MARIVOR_LOG_JSON") {
      Some(v) => v
        .trim()
        .parse::<bool>()
        .map_err(|e| AppError::Config(format!("Invalid MARIVOR_LOG_JSON value: {}", e)))?,
      None => defaults.log_json,
    };

    let seed_catalog_path = get("MARIVOR_SEED_CATALOG").map(PathBuf::from);

    tracing::info!(%currency_code, log_json, seeded = seed_catalog_path.is_some(), "Application configuration loaded.");

    Ok(Self {
      currency_code,
      log_filter,
      log_json,
      seed_catalog_path,
    })
  }
}
