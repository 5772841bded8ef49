// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use marivor_core::{Category, ContextData, PipelineControl, Product, ShopError, WorkflowError};
use std::future::Future;
use std::pin::Pin;
use tracing::Level;

// --- Pipeline test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Workflow error: {0}")]
  Workflow(String), // Stored as the Debug string so TestError stays Eq

  #[error("Shop error: {0}")]
  Shop(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<WorkflowError> for TestError {
  fn from(err: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", err))
  }
}

impl From<ShopError> for TestError {
  fn from(err: ShopError) -> Self {
    TestError::Shop(err.kind().to_string())
  }
}

// --- Common Handler Creators ---
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<PipelineControl, TestError>> + Send>>;

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> impl Fn(ContextData<TestContext>) -> HandlerFuture + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> HandlerFuture {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = %step_name, "executed, counter: {}", guard.counter);
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> impl Fn(ContextData<TestContext>) -> HandlerFuture + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> HandlerFuture {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = %step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  }
}

// --- Product fixtures ---
pub fn product(id: i64, name: &str, price_cents: i64, stock: u32) -> Product {
  Product {
    id,
    name: name.to_string(),
    category: Category::Fish,
    price_cents,
    stock,
    sold_by_weight: false,
    seller_id: None,
  }
}

pub fn vegetable(id: i64, name: &str, price_cents: i64, stock: u32) -> Product {
  Product {
    category: Category::Vegetable,
    ..product(id, name, price_cents, stock)
  }
}

pub fn from_seller(mut product: Product, seller_id: i64) -> Product {
  product.seller_id = Some(seller_id);
  product
}

/// Price 100, stock 5.
pub fn product_a() -> Product {
  product(1, "Bangus", 100, 5)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
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
