// storefront/src/handlers/checkout_handlers.rs

use crate::errors::{AppError, Result};
use crate::handlers::run_pipeline;
use crate::handlers::views::{CartView, CheckoutView, OrderSummary};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use marivor_core::ContextData;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[instrument(name = "handler::checkout", skip(app_state), fields(session_id = %session_id))]
pub async fn checkout(app_state: &AppState, session_id: Uuid) -> Result<CheckoutView> {
  let session = app_state.sessions.get_or_create(session_id);
  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.clone(), session.clone()));

  if let Err(e) = run_pipeline(app_state, ctx_data.clone()).await {
    let stored = ctx_data.read().placed_orders.len();
    if stored > 0 {
      warn!("Checkout failed with {} order(s) already stored: {}", stored, e);
    }
    return Err(e);
  }

  let currency = &app_state.config.currency_code;
  let orders: Vec<OrderSummary> = ctx_data
    .read()
    .placed_orders
    .iter()
    .map(|o| OrderSummary::from_order(o, currency))
    .collect();
  if orders.is_empty() {
    return Err(AppError::Internal("Checkout completed without placing an order.".to_string()));
  }

  info!("Checkout successful: {} order(s) placed.", orders.len());
  let cart = CartView::from_cart(session.read().cart(), currency);
  Ok(CheckoutView {
    message: format!("Placed {} order(s).", orders.len()),
    orders,
    cart,
  })
}
