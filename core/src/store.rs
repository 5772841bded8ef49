// core/src/store.rs

//! The Order Store collaborator.

use crate::error::{ShopError, ShopResult};
use crate::order::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Stores a new order and returns the id it was given.
  async fn persist(&self, order: Order) -> ShopResult<OrderId>;

  /// Fails with `ShopError::NotFound` for an unknown id.
  async fn load(&self, id: OrderId) -> ShopResult<Order>;

  /// Writes back a persisted order whose status moved on from `expected`.
  ///
  /// Fails with `ShopError::StatusChanged` when the stored row is no longer
  /// at `expected`, so of two racing transitions only the first is kept.
  async fn save_status(&self, order: &Order, expected: OrderStatus) -> ShopResult<()>;

  /// All orders, or only those with `status`, oldest first.
  async fn list(&self, status: Option<OrderStatus>) -> ShopResult<Vec<Order>>;
}

/// Orders kept in memory with sequential ids starting at 1.
#[derive(Debug)]
pub struct InMemoryOrderStore {
  orders: RwLock<BTreeMap<OrderId, Order>>,
  next_id: AtomicI64,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self {
      orders: RwLock::new(BTreeMap::new()),
      next_id: AtomicI64::new(1),
    }
  }

  pub fn len(&self) -> usize {
    self.orders.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.read().is_empty()
  }
}

impl Default for InMemoryOrderStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn persist(&self, mut order: Order) -> ShopResult<OrderId> {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    order.assign_id(id);
    self.orders.write().insert(id, order);
    Ok(id)
  }

  async fn load(&self, id: OrderId) -> ShopResult<Order> {
    self
      .orders
      .read()
      .get(&id)
      .cloned()
      .ok_or_else(|| ShopError::order_not_found(id))
  }

  async fn save_status(&self, order: &Order, expected: OrderStatus) -> ShopResult<()> {
    let id = order.id().ok_or_else(|| ShopError::NotFound {
      entity: "Order",
      id: "<unsaved>".to_string(),
    })?;
    let mut orders = self.orders.write();
    let stored = orders.get_mut(&id).ok_or_else(|| ShopError::order_not_found(id))?;
    if stored.status() != expected {
      return Err(ShopError::StatusChanged {
        expected,
        actual: stored.status(),
      });
    }
    *stored = order.clone();
    Ok(())
  }

  async fn list(&self, status: Option<OrderStatus>) -> ShopResult<Vec<Order>> {
    Ok(
      self
        .orders
        .read()
        .values()
        .filter(|o| status.map_or(true, |s| o.status() == s))
        .cloned()
        .collect(),
    )
  }
}
