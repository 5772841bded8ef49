// core/src/dashboard.rs

//! Back-office overview numbers.

use crate::catalog::{Category, ProductLookup};
use crate::error::ShopResult;
use crate::order::OrderStatus;
use crate::store::OrderStore;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
  pub total_products: usize,
  pub fish_products: usize,
  pub vegetable_products: usize,
  pub processing_orders: usize,
  pub delivery_orders: usize,
}

impl DashboardStats {
  pub async fn collect<C>(catalog: &C, orders: &dyn OrderStore) -> ShopResult<Self>
  where
    C: ProductLookup + ?Sized,
  {
    let products = catalog.list_products().await?;
    let count_category = |category: Category| products.iter().filter(|p| p.category == category).count();

    Ok(Self {
      total_products: products.len(),
      fish_products: count_category(Category::Fish),
      vegetable_products: count_category(Category::Vegetable),
      processing_orders: orders.list(Some(OrderStatus::Processing)).await?.len(),
      delivery_orders: orders.list(Some(OrderStatus::OnDelivery)).await?.len(),
    })
  }
}
