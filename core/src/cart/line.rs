// core/src/cart/line.rs
use crate::catalog::{Product, ProductId, SellerId};
use serde::{Deserialize, Serialize};

/// One product-quantity pairing inside a cart.
///
/// Name, price and seller are copied from the product when the line is
/// created; `stock_limit` is the stock seen at the last add or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub product_id: ProductId,
  pub name: String,
  pub unit_price_cents: i64,
  pub quantity: u32,
  pub stock_limit: u32,
  #[serde(default)]
  pub seller_id: Option<SellerId>,
}

impl CartLine {
  pub(crate) fn from_product(product: &Product, quantity: u32) -> Self {
    Self {
      product_id: product.id,
      name: product.name.clone(),
      unit_price_cents: product.price_cents,
      quantity,
      stock_limit: product.stock,
      seller_id: product.seller_id,
    }
  }

  /// Lines held by a `Cart` or an `Order` always fit in `i64`; anything else saturates.
  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.quantity).saturating_mul(self.unit_price_cents)
  }

  pub fn checked_line_total_cents(&self) -> Option<i64> {
    i64::from(self.quantity).checked_mul(self.unit_price_cents)
  }
}
