// storefront/src/handlers/views.rs

//! JSON shapes returned to the transport layer.

use marivor_core::{format_minor_units, Cart, CartLine, Category, Order, OrderId, OrderStatus, Product, ProductId, SellerId};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
  pub id: ProductId,
  pub name: String,
  pub category: Category,
  pub price_cents: i64,
  pub price_display: String,
  pub stock: u32,
  pub in_stock: bool,
  pub sold_by_weight: bool,
  pub seller_id: Option<SellerId>,
}

impl ProductView {
  pub fn from_product(product: &Product, currency_code: &str) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      category: product.category,
      price_cents: product.price_cents,
      price_display: format_minor_units(product.price_cents, currency_code),
      stock: product.stock,
      in_stock: product.stock > 0,
      sold_by_weight: product.sold_by_weight,
      seller_id: product.seller_id,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
  pub product_id: ProductId,
  pub name: String,
  pub unit_price_cents: i64,
  pub quantity: u32,
  pub stock_limit: u32,
  pub line_total_cents: i64,
  pub line_total_display: String,
}

impl CartLineView {
  pub fn from_line(line: &CartLine, currency_code: &str) -> Self {
    let line_total_cents = line.line_total_cents();
    Self {
      product_id: line.product_id,
      name: line.name.clone(),
      unit_price_cents: line.unit_price_cents,
      quantity: line.quantity,
      stock_limit: line.stock_limit,
      line_total_cents,
      line_total_display: format_minor_units(line_total_cents, currency_code),
    }
  }
}

/// Cart snapshot plus the count shown next to the cart icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub lines: Vec<CartLineView>,
  pub total_items: u64,
  pub total_price_cents: i64,
  pub total_price_display: String,
  pub cart_count: usize,
}

impl CartView {
  pub fn from_cart(cart: &Cart, currency_code: &str) -> Self {
    Self {
      lines: cart
        .lines()
        .iter()
        .map(|l| CartLineView::from_line(l, currency_code))
        .collect(),
      total_items: cart.total_items(),
      total_price_cents: cart.total_price_cents(),
      total_price_display: format_minor_units(cart.total_price_cents(), currency_code),
      cart_count: cart.lines().len(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub id: Option<OrderId>,
  pub status: OrderStatus,
  pub seller_id: Option<SellerId>,
  pub total_amount_cents: i64,
  pub total_amount_display: String,
  pub items: Vec<CartLineView>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl OrderSummary {
  pub fn from_order(order: &Order, currency_code: &str) -> Self {
    Self {
      id: order.id(),
      status: order.status(),
      seller_id: order.seller_id(),
      total_amount_cents: order.total_amount_cents(),
      total_amount_display: format_minor_units(order.total_amount_cents(), currency_code),
      items: order
        .items()
        .iter()
        .map(|l| CartLineView::from_line(l, currency_code))
        .collect(),
      created_at: order.created_at(),
      updated_at: order.updated_at(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
  pub message: String,
  pub orders: Vec<OrderSummary>,
  pub cart: CartView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateView {
  pub order_id: OrderId,
  pub previous_status: OrderStatus,
  pub status: OrderStatus,
}
