// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use marivor_core::{
  Category, InMemoryCatalog, InMemoryOrderStore, Order, OrderId, OrderStatus, OrderStore, Product, ShopError,
  ShopResult,
};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront::{AppConfig, AppState};
use tracing::Level;

pub const BANGUS: i64 = 1;
pub const OKRA: i64 = 2;
pub const PUSIT: i64 = 3;

pub const FISH_SELLER: i64 = 20;
pub const VEGETABLE_SELLER: i64 = 10;

pub fn product(id: i64, name: &str, category: Category, price_cents: i64, stock: u32, seller_id: i64) -> Product {
  Product {
    id,
    name: name.to_string(),
    category,
    price_cents,
    stock,
    sold_by_weight: category == Category::Fish,
    seller_id: Some(seller_id),
  }
}

pub fn seed_products() -> Vec<Product> {
  vec![
    product(BANGUS, "Bangus", Category::Fish, 100, 5, FISH_SELLER),
    product(OKRA, "Okra", Category::Vegetable, 40, 9, VEGETABLE_SELLER),
    product(PUSIT, "Pusit", Category::Fish, 250, 3, FISH_SELLER),
  ]
}

pub fn test_config() -> AppConfig {
  AppConfig {
    currency_code: "PHP".to_string(),
    ..AppConfig::default()
  }
}

pub struct TestApp {
  pub state: AppState,
  pub catalog: Arc<InMemoryCatalog>,
  pub orders: Arc<InMemoryOrderStore>,
}

/// App state over the seed catalog and an empty in-memory order store.
pub fn test_app() -> TestApp {
  let catalog = Arc::new(InMemoryCatalog::with_products(seed_products()).unwrap());
  let orders = Arc::new(InMemoryOrderStore::new());
  let state = AppState::new(test_config(), catalog.clone(), orders.clone());
  TestApp { state, catalog, orders }
}

/// Order store whose `failing_call`-th persist fails (1-based); every other call succeeds.
pub struct FlakyOrderStore {
  inner: InMemoryOrderStore,
  failing_call: usize,
  calls: AtomicUsize,
}

impl FlakyOrderStore {
  pub fn failing_on(failing_call: usize) -> Self {
    Self {
      inner: InMemoryOrderStore::new(),
      failing_call,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn stored(&self) -> usize {
    self.inner.len()
  }
}

#[async_trait]
impl OrderStore for FlakyOrderStore {
  async fn persist(&self, order: Order) -> ShopResult<OrderId> {
    if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.failing_call {
      return Err(ShopError::Collaborator {
        source: anyhow::anyhow!("order table unavailable"),
      });
    }
    self.inner.persist(order).await
  }

  async fn load(&self, id: OrderId) -> ShopResult<Order> {
    self.inner.load(id).await
  }

  async fn save_status(&self, order: &Order, expected: OrderStatus) -> ShopResult<()> {
    self.inner.save_status(order, expected).await
  }

  async fn list(&self, status: Option<OrderStatus>) -> ShopResult<Vec<Order>> {
    self.inner.list(status).await
  }
}

/// Order store that yields to the runtime after every load, so concurrent
/// updates all read the order before any of them saves.
#[derive(Default)]
pub struct YieldingOrderStore {
  pub inner: InMemoryOrderStore,
}

#[async_trait]
impl OrderStore for YieldingOrderStore {
  async fn persist(&self, order: Order) -> ShopResult<OrderId> {
    self.inner.persist(order).await
  }

  async fn load(&self, id: OrderId) -> ShopResult<Order> {
    let order = self.inner.load(id).await;
    tokio::task::yield_now().await;
    order
  }

  async fn save_status(&self, order: &Order, expected: OrderStatus) -> ShopResult<()> {
    self.inner.save_status(order, expected).await
  }

  async fn list(&self, status: Option<OrderStatus>) -> ShopResult<Vec<Order>> {
    self.inner.list(status).await
  }
}

/// Order store whose saves go to a table that never saw the persisted orders,
/// as if each order was deleted right after it was loaded.
#[derive(Default)]
pub struct VanishingOrderStore {
  pub loaded_from: InMemoryOrderStore,
  saved_to: InMemoryOrderStore,
}

#[async_trait]
impl OrderStore for VanishingOrderStore {
  async fn persist(&self, order: Order) -> ShopResult<OrderId> {
    self.loaded_from.persist(order).await
  }

  async fn load(&self, id: OrderId) -> ShopResult<Order> {
    self.loaded_from.load(id).await
  }

  async fn save_status(&self, order: &Order, expected: OrderStatus) -> ShopResult<()> {
    self.saved_to.save_status(order, expected).await
  }

  async fn list(&self, status: Option<OrderStatus>) -> ShopResult<Vec<Order>> {
    self.loaded_from.list(status).await
  }
}

/// App state over the seed catalog and the given order store.
pub fn app_with_orders(orders: Arc<dyn OrderStore>) -> AppState {
  let catalog = Arc::new(InMemoryCatalog::with_products(seed_products()).unwrap());
  AppState::new(test_config(), catalog, orders)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
