// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::catalog::ProductId;
use crate::order::OrderStatus;

/// Failures of the cart and order operations.
///
/// Every variant is a value the calling layer can turn into a user-facing
/// message; none of them is fatal and none is worth retrying.
#[derive(Debug, Error)]
pub enum ShopError {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  OutOfStock {
    product_id: ProductId,
    requested: u64,
    available: u32,
  },

  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),

  #[error("Order is already {status}")]
  SameStatus { status: OrderStatus },

  #[error("Illegal order status transition from {from} to {to}")]
  IllegalTransition { from: OrderStatus, to: OrderStatus },

  #[error("Unknown order status: {0}")]
  UnknownStatus(String),

  #[error("Cannot check out an empty cart")]
  EmptyCart,

  #[error("Invalid product: {0}")]
  InvalidProduct(String),

  #[error("Amount exceeds the supported range")]
  AmountOverflow,

  #[error("Order status changed concurrently: expected {expected}, found {actual}")]
  StatusChanged { expected: OrderStatus, actual: OrderStatus },

  #[error("Collaborator call failed. Source: {source}")]
  Collaborator {
    #[source]
    source: AnyhowError,
  },
}

impl ShopError {
  pub fn product_not_found(id: ProductId) -> Self {
    ShopError::NotFound {
      entity: "Product",
      id: id.to_string(),
    }
  }

  pub fn order_not_found(id: crate::order::OrderId) -> Self {
    ShopError::NotFound {
      entity: "Order",
      id: id.to_string(),
    }
  }

  pub fn line_not_found(product_id: ProductId) -> Self {
    ShopError::NotFound {
      entity: "Cart line",
      id: product_id.to_string(),
    }
  }

  /// Short machine-readable name of the error kind, used in response bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      ShopError::NotFound { .. } => "not_found",
      ShopError::OutOfStock { .. } => "out_of_stock",
      ShopError::InvalidQuantity(_) => "invalid_quantity",
      ShopError::SameStatus { .. } => "same_status",
      ShopError::IllegalTransition { .. } => "illegal_transition",
      ShopError::UnknownStatus(_) => "unknown_status",
      ShopError::EmptyCart => "empty_cart",
      ShopError::InvalidProduct(_) => "invalid_product",
      ShopError::AmountOverflow => "amount_overflow",
      ShopError::StatusChanged { .. } => "status_changed",
      ShopError::Collaborator { .. } => "collaborator",
    }
  }
}

impl From<AnyhowError> for ShopError {
  fn from(err: AnyhowError) -> Self {
    // Adapters sometimes wrap a ShopError in anyhow; unwrap it instead of nesting.
    match err.downcast::<ShopError>() {
      Ok(shop_err) => shop_err,
      Err(source) => ShopError::Collaborator { source },
    }
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;

/// Errors raised by the pipeline engine itself rather than by step handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {type_name}")]
  NotRegistered { type_name: String },

  #[error("Type mismatch during context downcast (expected {expected_type})")]
  TypeMismatch { expected_type: String },
}

pub type WorkflowResult<T, E = WorkflowError> = std::result::Result<T, E>;
