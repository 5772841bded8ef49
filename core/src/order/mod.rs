// core/src/order/mod.rs

//! Orders created from a cart, and the status workflow they follow.

mod status;

pub use status::OrderStatus;

use crate::cart::{Cart, CartLine};
use crate::catalog::SellerId;
use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub type OrderId = i64;
pub type UserId = i64;

/// A placed order. Only `status` (and `updated_at` with it) changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  id: Option<OrderId>,
  status: OrderStatus,
  total_amount_cents: i64,
  items: Vec<CartLine>,
  seller_id: Option<SellerId>,
  session_id: Uuid,
  user_id: Option<UserId>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl Order {
  /// A new `pending` order over a snapshot of `items`. The id is assigned by the order store.
  pub fn pending(
    items: Vec<CartLine>,
    seller_id: Option<SellerId>,
    session_id: Uuid,
    user_id: Option<UserId>,
  ) -> ShopResult<Self> {
    if items.is_empty() {
      return Err(ShopError::EmptyCart);
    }
    let total_amount_cents = items.iter().try_fold(0i64, |total, line| {
      line
        .checked_line_total_cents()
        .and_then(|t| total.checked_add(t))
        .ok_or(ShopError::AmountOverflow)
    })?;
    let now = Utc::now();
    Ok(Self {
      id: None,
      status: OrderStatus::Pending,
      total_amount_cents,
      items,
      seller_id,
      session_id,
      user_id,
      created_at: now,
      updated_at: now,
    })
  }

  pub fn id(&self) -> Option<OrderId> {
    self.id
  }

  pub fn status(&self) -> OrderStatus {
    self.status
  }

  pub fn total_amount_cents(&self) -> i64 {
    self.total_amount_cents
  }

  pub fn items(&self) -> &[CartLine] {
    &self.items
  }

  pub fn seller_id(&self) -> Option<SellerId> {
    self.seller_id
  }

  pub fn session_id(&self) -> Uuid {
    self.session_id
  }

  pub fn user_id(&self) -> Option<UserId> {
    self.user_id
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }

  /// Called by the order store when the order is first persisted.
  pub fn assign_id(&mut self, id: OrderId) {
    self.id = Some(id);
  }

  /// Moves the order to `new_status` if the status table allows it.
  pub fn transition(&mut self, new_status: OrderStatus) -> ShopResult<OrderStatus> {
    self.status.validate_transition(new_status)?;
    info!(order_id = ?self.id, from = %self.status, to = %new_status, "Order status changed.");
    self.status = new_status;
    self.updated_at = Utc::now();
    Ok(new_status)
  }
}

/// Free-function form of [`Order::transition`].
pub fn transition(order: &mut Order, new_status: OrderStatus) -> ShopResult<OrderStatus> {
  order.transition(new_status)
}

/// Splits a cart into one pending order per seller, in order of each
/// seller's first line. The cart itself is not modified.
pub fn orders_from_cart(cart: &Cart, session_id: Uuid, user_id: Option<UserId>) -> ShopResult<Vec<Order>> {
  if cart.is_empty() {
    return Err(ShopError::EmptyCart);
  }
  cart
    .lines_by_seller()
    .into_iter()
    .map(|(seller_id, lines)| Order::pending(lines, seller_id, session_id, user_id))
    .collect()
}
