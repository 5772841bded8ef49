// storefront/src/errors.rs

use marivor_core::{ShopError, WorkflowError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("{0}")]
  Shop(#[from] ShopError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A pipeline stopped gracefully, but the request needed it to finish.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

// Lets handlers use `?` on anything returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<ShopError>() {
      Ok(shop_err) => AppError::Shop(shop_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

/// What the transport layer needs to answer a failed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
  pub status: u16,
  pub body: Value,
}

impl AppError {
  /// HTTP-style status code for this error.
  pub fn status_code(&self) -> u16 {
    match self {
      AppError::Validation(_) => 400,
      AppError::Shop(shop_err) => match shop_err {
        ShopError::NotFound { .. } => 404,
        ShopError::OutOfStock { .. }
        | ShopError::SameStatus { .. }
        | ShopError::IllegalTransition { .. }
        | ShopError::StatusChanged { .. } => 409,
        ShopError::InvalidQuantity(_)
        | ShopError::UnknownStatus(_)
        | ShopError::EmptyCart
        | ShopError::InvalidProduct(_)
        | ShopError::AmountOverflow => 400,
        ShopError::Collaborator { .. } => 502,
      },
      AppError::PipelineHaltedByHandler => 409,
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => 500,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation",
      AppError::Shop(shop_err) => shop_err.kind(),
      AppError::Config(_) => "config",
      AppError::Workflow { .. } => "workflow",
      AppError::Internal(_) => "internal",
      AppError::PipelineHaltedByHandler => "halted",
    }
  }

  /// Converts the error into a status and JSON body, logging it on the way out.
  pub fn to_response(&self) -> ErrorResponse {
    let status = self.status_code();
    if status >= 500 {
      tracing::error!(application_error = %self, status, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status, "Responding with error");
    }

    let message = match self {
      // Keep internals out of user-facing messages.
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Workflow { .. } => "Workflow processing error".to_string(),
      AppError::Shop(ShopError::Collaborator { .. }) => "Backend service error".to_string(),
      other => other.to_string(),
    };

    ErrorResponse {
      status,
      body: json!({ "error": message, "kind": self.kind() }),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
