// storefront/src/handlers/cart_handlers.rs

use crate::errors::{AppError, Result};
use crate::handlers::views::CartView;
use crate::handlers::{parse_payload, run_pipeline};
use crate::pipelines::contexts::{AddToCartCtxData, RemoveFromCartCtxData, UpdateCartLineCtxData};
use crate::state::AppState;
use marivor_core::{ContextData, ProductId, ShopError};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: ProductId,
  #[serde(default)]
  pub quantity: Option<Value>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartLineRequestPayload {
  pub product_id: ProductId,
  #[serde(default)]
  pub quantity: Option<Value>,
}

/// Reads a quantity sent either as a JSON integer or as an integer string
/// (form posts). Anything else is `InvalidQuantity`. `None` and `null` fall back
/// to `default` when there is one.
pub fn parse_quantity(raw: Option<&Value>, default: Option<i64>) -> Result<i64> {
  let invalid = |shown: String| AppError::from(ShopError::InvalidQuantity(format!("{} is not a whole number", shown)));

  match raw {
    None | Some(Value::Null) => default.ok_or_else(|| invalid("missing quantity".to_string())),
    Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(n.to_string())),
    Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(format!("{:?}", s))),
    Some(other) => Err(invalid(other.to_string())),
  }
}

#[instrument(name = "handler::view_cart", skip(app_state), fields(session_id = %session_id))]
pub async fn view_cart(app_state: &AppState, session_id: Uuid) -> Result<CartView> {
  let session = app_state.sessions.get_or_create(session_id);
  let view = CartView::from_cart(session.read().cart(), &app_state.config.currency_code);
  Ok(view)
}

#[instrument(name = "handler::add_to_cart", skip(app_state, payload), fields(session_id = %session_id))]
pub async fn add_to_cart(app_state: &AppState, session_id: Uuid, payload: Value) -> Result<CartView> {
  let req: AddToCartRequestPayload = parse_payload(payload)?;
  let quantity = parse_quantity(req.quantity.as_ref(), Some(1))?;
  info!("Add to cart attempt: product {}, quantity {}", req.product_id, quantity);

  let session = app_state.sessions.get_or_create(session_id);
  let ctx_data = ContextData::new(AddToCartCtxData::new(
    app_state.clone(),
    session.clone(),
    req.product_id,
    quantity,
  ));
  run_pipeline(app_state, ctx_data).await?;

  let view = CartView::from_cart(session.read().cart(), &app_state.config.currency_code);
  info!("Add to cart successful. Cart now holds {} item(s).", view.total_items);
  Ok(view)
}

#[instrument(name = "handler::update_cart_line", skip(app_state, payload), fields(session_id = %session_id))]
pub async fn update_cart_line(app_state: &AppState, session_id: Uuid, payload: Value) -> Result<CartView> {
  let req: UpdateCartLineRequestPayload = parse_payload(payload)?;
  let quantity = parse_quantity(req.quantity.as_ref(), None)?;
  info!("Cart update attempt: product {}, quantity {}", req.product_id, quantity);

  let session = app_state.sessions.get_or_create(session_id);
  let ctx_data = ContextData::new(UpdateCartLineCtxData::new(
    app_state.clone(),
    session.clone(),
    req.product_id,
    quantity,
  ));
  run_pipeline(app_state, ctx_data).await?;

  let view = CartView::from_cart(session.read().cart(), &app_state.config.currency_code);
  Ok(view)
}

#[instrument(name = "handler::remove_from_cart", skip(app_state), fields(session_id = %session_id))]
pub async fn remove_from_cart(app_state: &AppState, session_id: Uuid, product_id: ProductId) -> Result<CartView> {
  let session = app_state.sessions.get_or_create(session_id);
  let ctx_data = ContextData::new(RemoveFromCartCtxData::new(app_state.clone(), session.clone(), product_id));
  run_pipeline(app_state, ctx_data).await?;

  let view = CartView::from_cart(session.read().cart(), &app_state.config.currency_code);
  Ok(view)
}
