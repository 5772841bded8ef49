// storefront/src/handlers/order_handlers.rs

//! Back-office order handlers.

use crate::errors::{AppError, Result};
use crate::handlers::views::{OrderSummary, StatusUpdateView};
use crate::handlers::{parse_payload, run_pipeline};
use crate::pipelines::contexts::UpdateOrderStatusCtxData;
use crate::state::AppState;
use marivor_core::{ContextData, DashboardStats, OrderId, OrderStatus};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusRequestPayload {
  pub status: String,
}

#[instrument(name = "handler::update_order_status", skip(app_state, payload), fields(order_id = order_id))]
pub async fn update_order_status(app_state: &AppState, order_id: OrderId, payload: Value) -> Result<StatusUpdateView> {
  let req: UpdateOrderStatusRequestPayload = parse_payload(payload)?;
  let requested: OrderStatus = req.status.parse()?;

  let ctx_data = ContextData::new(UpdateOrderStatusCtxData::new(app_state.clone(), order_id, requested));
  run_pipeline(app_state, ctx_data.clone()).await?;

  let previous_status = ctx_data
    .read()
    .previous_status
    .ok_or_else(|| AppError::Internal("Status update completed without a previous status.".to_string()))?;
  info!("Order {} moved from {} to {}.", order_id, previous_status, requested);

  Ok(StatusUpdateView {
    order_id,
    previous_status,
    status: requested,
  })
}

/// `filter` is `all` (or empty) or a status name, legacy aliases included.
#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders(app_state: &AppState, filter: &str) -> Result<Vec<OrderSummary>> {
  let status = match filter.trim() {
    "" => None,
    f if f.eq_ignore_ascii_case("all") => None,
    f => Some(f.parse::<OrderStatus>()?),
  };

  let orders = app_state.orders.list(status).await?;
  let currency = &app_state.config.currency_code;
  Ok(orders.iter().map(|o| OrderSummary::from_order(o, currency)).collect())
}

#[instrument(name = "handler::order_detail", skip(app_state))]
pub async fn order_detail(app_state: &AppState, order_id: OrderId) -> Result<OrderSummary> {
  let order = app_state.orders.load(order_id).await?;
  Ok(OrderSummary::from_order(&order, &app_state.config.currency_code))
}

#[instrument(name = "handler::dashboard", skip(app_state))]
pub async fn dashboard(app_state: &AppState) -> Result<DashboardStats> {
  let stats = DashboardStats::collect(app_state.catalog.as_ref(), app_state.orders.as_ref()).await?;
  Ok(stats)
}
