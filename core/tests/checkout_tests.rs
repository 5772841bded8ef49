// tests/checkout_tests.rs
mod common;

use common::*;
use marivor_core::{
  orders_from_cart, Cart, DashboardStats, InMemoryCatalog, InMemoryOrderStore, OrderStatus, OrderStore, ShopError,
};
use uuid::Uuid;

fn multi_seller_cart() -> Cart {
  let mut cart = Cart::new();
  cart.add(&from_seller(product(1, "Bangus", 100, 5), 20), 2).unwrap();
  cart.add(&from_seller(vegetable(2, "Okra", 40, 9), 10), 3).unwrap();
  cart.add(&from_seller(product(3, "Pusit", 250, 9), 20), 1).unwrap();
  cart
}

#[test]
fn test_orders_split_per_seller_with_snapshot_totals() {
  let cart = multi_seller_cart();
  let session_id = Uuid::new_v4();
  let orders = orders_from_cart(&cart, session_id, Some(42)).unwrap();

  assert_eq!(orders.len(), 2);
  assert_eq!(orders[0].seller_id(), Some(20));
  assert_eq!(orders[0].total_amount_cents(), 2 * 100 + 250);
  assert_eq!(orders[0].items().len(), 2);
  assert_eq!(orders[1].seller_id(), Some(10));
  assert_eq!(orders[1].total_amount_cents(), 120);

  for order in &orders {
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.session_id(), session_id);
    assert_eq!(order.user_id(), Some(42));
    assert_eq!(order.id(), None);
  }
  // Splitting does not touch the cart.
  assert_eq!(cart.total_items(), 6);
}

#[test]
fn test_empty_cart_cannot_become_an_order() {
  assert!(matches!(
    orders_from_cart(&Cart::new(), Uuid::new_v4(), None),
    Err(ShopError::EmptyCart)
  ));
}

#[tokio::test]
async fn test_in_memory_store_assigns_ids_and_filters_by_status() {
  let store = InMemoryOrderStore::new();
  let orders = orders_from_cart(&multi_seller_cart(), Uuid::new_v4(), None).unwrap();

  let mut ids = Vec::new();
  for order in orders {
    ids.push(store.persist(order).await.unwrap());
  }
  assert_eq!(ids, vec![1, 2]);
  assert_eq!(store.len(), 2);

  let mut second = store.load(2).await.unwrap();
  assert_eq!(second.id(), Some(2));
  second.transition(OrderStatus::Processing).unwrap();
  store.save_status(&second, OrderStatus::Pending).await.unwrap();

  assert_eq!(store.list(None).await.unwrap().len(), 2);
  let processing = store.list(Some(OrderStatus::Processing)).await.unwrap();
  assert_eq!(processing.len(), 1);
  assert_eq!(processing[0].id(), Some(2));

  assert!(matches!(store.load(77).await, Err(ShopError::NotFound { entity: "Order", .. })));
}

#[tokio::test]
async fn test_saving_an_unpersisted_order_is_not_found() {
  let store = InMemoryOrderStore::default();
  let order = orders_from_cart(&multi_seller_cart(), Uuid::new_v4(), None)
    .unwrap()
    .remove(0);
  assert!(matches!(store.save_status(&order, OrderStatus::Pending).await, Err(ShopError::NotFound { .. })));
  assert!(store.is_empty());
}

#[tokio::test]
async fn test_dashboard_counts_categories_and_active_orders() {
  let catalog = InMemoryCatalog::with_products([
    product_a(),
    product(2, "Tilapia", 120, 4),
    vegetable(3, "Sitaw", 30, 10),
  ])
  .unwrap();
  let store = InMemoryOrderStore::new();
  for _ in 0..3 {
    let order = orders_from_cart(&multi_seller_cart(), Uuid::new_v4(), None).unwrap().remove(0);
    store.persist(order).await.unwrap();
  }
  let mut first = store.load(1).await.unwrap();
  first.transition(OrderStatus::Processing).unwrap();
  store.save_status(&first, OrderStatus::Pending).await.unwrap();
  let mut second = store.load(2).await.unwrap();
  second.transition(OrderStatus::Processing).unwrap();
  second.transition(OrderStatus::OnDelivery).unwrap();
  store.save_status(&second, OrderStatus::Pending).await.unwrap();

  let stats = DashboardStats::collect(&catalog, &store).await.unwrap();
  assert_eq!(
    stats,
    DashboardStats {
      total_products: 3,
      fish_products: 2,
      vegetable_products: 1,
      processing_orders: 1,
      delivery_orders: 1,
    }
  );
}

#[tokio::test]
async fn test_stale_status_save_is_rejected() {
  let store = InMemoryOrderStore::new();
  let order = orders_from_cart(&multi_seller_cart(), Uuid::new_v4(), None).unwrap().remove(0);
  let id = store.persist(order).await.unwrap();

  // Two admins load the same pending order.
  let mut first = store.load(id).await.unwrap();
  let mut second = store.load(id).await.unwrap();
  first.transition(OrderStatus::Processing).unwrap();
  second.transition(OrderStatus::Cancelled).unwrap();

  store.save_status(&first, OrderStatus::Pending).await.unwrap();
  let err = store.save_status(&second, OrderStatus::Pending).await.unwrap_err();
  assert!(matches!(
    err,
    ShopError::StatusChanged {
      expected: OrderStatus::Pending,
      actual: OrderStatus::Processing
    }
  ));
  assert_eq!(store.load(id).await.unwrap().status(), OrderStatus::Processing);
}

#[tokio::test]
async fn test_saving_an_order_missing_from_the_store_is_not_found() {
  let store = InMemoryOrderStore::new();
  let mut order = orders_from_cart(&multi_seller_cart(), Uuid::new_v4(), None).unwrap().remove(0);
  order.assign_id(404);
  order.transition(OrderStatus::Processing).unwrap();

  let err = store.save_status(&order, OrderStatus::Pending).await.unwrap_err();
  assert!(matches!(err, ShopError::NotFound { entity: "Order", ref id } if id == "404"));
}
