// storefront/src/pipelines/checkout_pipeline.rs

//! Checkout: one pending order per seller, persisted, then the cart is cleared.
//!
//! When a persist fails part way, the orders already stored stay and their
//! lines leave the cart, so a retry only places the remaining sellers.

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::CheckoutCtxData;
use marivor_core::{orders_from_cart, Cart, ContextData, Order, Pipeline, PipelineControl, ProductId, Registry, SessionHandle};
use tracing::{error, info, instrument};

pub fn register_checkout_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("build_orders_from_cart", false),
    ("persist_orders", false),
    ("clear_session_cart", false),
  ]);

  p.on_root("build_orders_from_cart", build_orders_from_cart);
  p.on_root("persist_orders", persist_orders);
  p.on_root("clear_session_cart", clear_session_cart);

  registry.register_pipeline(p);
}

#[instrument(name = "checkout::build_orders", skip(ctx_data), err)]
async fn build_orders_from_cart(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let mut guard = ctx_data.write();
  let orders = {
    let session = guard.session.read();
    orders_from_cart(session.cart(), session.session_id, session.user_id)?
  };

  info!("Checkout Pipeline: Cart split into {} order(s).", orders.len());
  guard.pending_orders = orders;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::persist_orders", skip(ctx_data), err)]
async fn persist_orders(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (pending, store) = {
    let mut guard = ctx_data.write();
    (std::mem::take(&mut guard.pending_orders), guard.app_state.orders.clone())
  };

  let mut placed = Vec::with_capacity(pending.len());
  for mut order in pending {
    let order_id = match store.persist(order.clone()).await {
      Ok(id) => id,
      Err(e) => {
        error!(
          "Checkout Pipeline: Persisting order failed after {} of the orders were stored: {}",
          placed.len(),
          e
        );
        let session = ctx_data.read().session.clone();
        release_placed_lines(&session, &placed);
        ctx_data.write().placed_orders = placed;
        return Err(AppError::from(e));
      }
    };
    order.assign_id(order_id);
    info!(
      "Checkout Pipeline: Order {} placed for seller {:?}, total {}.",
      order_id,
      order.seller_id(),
      order.total_amount_cents()
    );
    placed.push(order);
  }

  ctx_data.write().placed_orders = placed;
  Ok(PipelineControl::Continue)
}

/// Drops the lines of orders that were already stored from the session cart.
fn release_placed_lines(session: &SessionHandle, placed: &[Order]) {
  if placed.is_empty() {
    return;
  }
  let placed_products: Vec<ProductId> = placed
    .iter()
    .flat_map(|order| order.items().iter().map(|line| line.product_id))
    .collect();

  let mut session = session.write();
  let mut cart = session.cart().clone();
  cart.retain(|line| !placed_products.contains(&line.product_id));
  info!(
    "Checkout Pipeline: {} placed line(s) removed from the cart, {} left for a retry.",
    placed_products.len(),
    cart.lines().len()
  );
  session.commit_cart(cart);
}

#[instrument(name = "checkout::clear_session_cart", skip(ctx_data), err)]
async fn clear_session_cart(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let session = ctx_data.read().session.clone();
  session.write().commit_cart(Cart::new());
  Ok(PipelineControl::Continue)
}
