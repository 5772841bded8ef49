// tests/checkout_flow_tests.rs
mod common;

use common::*;
use marivor_core::{OrderStatus, OrderStore, ShopError};
use serde_json::json;
use std::sync::Arc;
use storefront::handlers::cart_handlers::{add_to_cart, view_cart};
use storefront::handlers::checkout_handlers::checkout;
use storefront::{AppError, AppState};
use uuid::Uuid;

async fn fill_cart(state: &AppState, session_id: Uuid) {
  for (product_id, quantity) in [(BANGUS, 2), (OKRA, 3), (PUSIT, 1)] {
    add_to_cart(state, session_id, json!({ "product_id": product_id, "quantity": quantity }))
      .await
      .unwrap();
  }
}

#[tokio::test]
async fn test_checkout_places_one_order_per_seller_and_clears_cart() {
  setup_tracing();
  let app = test_app();
  let session_id = Uuid::new_v4();
  fill_cart(&app.state, session_id).await;

  let result = checkout(&app.state, session_id).await.unwrap();

  assert_eq!(result.orders.len(), 2);
  assert_eq!(result.orders[0].seller_id, Some(FISH_SELLER));
  assert_eq!(result.orders[0].total_amount_cents, 2 * 100 + 250);
  assert_eq!(result.orders[0].items.len(), 2);
  assert_eq!(result.orders[1].seller_id, Some(VEGETABLE_SELLER));
  assert_eq!(result.orders[1].total_amount_display, "₱1.20");
  assert!(result.orders.iter().all(|o| o.status == OrderStatus::Pending));
  assert!(result.orders.iter().all(|o| o.id.is_some()));
  assert_eq!(result.cart.cart_count, 0);

  assert_eq!(app.orders.len(), 2);
  let view = view_cart(&app.state, session_id).await.unwrap();
  assert_eq!(view.total_items, 0);
  assert_eq!(view.total_price_cents, 0);
}

#[tokio::test]
async fn test_checkout_of_empty_cart_is_rejected() {
  setup_tracing();
  let app = test_app();

  let err = checkout(&app.state, Uuid::new_v4()).await.unwrap_err();

  assert!(matches!(err, AppError::Shop(ShopError::EmptyCart)));
  assert_eq!(err.status_code(), 400);
  assert!(app.orders.is_empty());
}

#[tokio::test]
async fn test_failed_persist_keeps_only_unplaced_lines_in_cart() {
  setup_tracing();
  let store = Arc::new(FlakyOrderStore::failing_on(2));
  let state = app_with_orders(store.clone());
  let session_id = Uuid::new_v4();
  fill_cart(&state, session_id).await;

  let err = checkout(&state, session_id).await.unwrap_err();

  assert!(matches!(err, AppError::Shop(ShopError::Collaborator { .. })));
  let response = err.to_response();
  assert_eq!(response.status, 502);
  assert_eq!(response.body["error"], "Backend service error");

  // The fish seller's order went through before the failure and left the cart.
  assert_eq!(store.stored(), 1);
  let view = view_cart(&state, session_id).await.unwrap();
  assert_eq!(view.cart_count, 1);
  assert_eq!(view.lines[0].product_id, OKRA);
  assert_eq!(view.total_items, 3);
  assert_eq!(view.total_price_cents, 120);
}

#[tokio::test]
async fn test_retry_after_partial_failure_places_each_seller_once() {
  setup_tracing();
  let store = Arc::new(FlakyOrderStore::failing_on(2));
  let state = app_with_orders(store.clone());
  let session_id = Uuid::new_v4();
  fill_cart(&state, session_id).await;

  checkout(&state, session_id).await.unwrap_err();
  let retried = checkout(&state, session_id).await.unwrap();

  assert_eq!(retried.orders.len(), 1);
  assert_eq!(retried.orders[0].seller_id, Some(VEGETABLE_SELLER));
  assert_eq!(retried.cart.cart_count, 0);

  let stored = store.list(None).await.unwrap();
  assert_eq!(stored.len(), 2);
  for seller in [FISH_SELLER, VEGETABLE_SELLER] {
    let count = stored.iter().filter(|o| o.seller_id() == Some(seller)).count();
    assert_eq!(count, 1, "seller {} should have exactly one order", seller);
  }
  let fish = stored.iter().find(|o| o.seller_id() == Some(FISH_SELLER)).unwrap();
  assert_eq!(fish.total_amount_cents(), 2 * 100 + 250);
}

#[tokio::test]
async fn test_failure_on_first_persist_keeps_whole_cart() {
  let store = Arc::new(FlakyOrderStore::failing_on(1));
  let state = app_with_orders(store.clone());
  let session_id = Uuid::new_v4();
  fill_cart(&state, session_id).await;

  checkout(&state, session_id).await.unwrap_err();

  assert_eq!(store.stored(), 0);
  let view = view_cart(&state, session_id).await.unwrap();
  assert_eq!(view.total_items, 6);
  assert_eq!(view.cart_count, 3);
}

#[tokio::test]
async fn test_placed_orders_are_listed_as_pending() {
  let app = test_app();
  let session_id = Uuid::new_v4();
  fill_cart(&app.state, session_id).await;
  checkout(&app.state, session_id).await.unwrap();

  let pending = app.orders.list(Some(OrderStatus::Pending)).await.unwrap();
  assert_eq!(pending.len(), 2);
  assert!(pending.iter().all(|o| o.session_id() == session_id));
}
