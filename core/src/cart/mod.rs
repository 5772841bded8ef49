// core/src/cart/mod.rs

//! The Cart Aggregator.
//!
//! A `Cart` keeps its lines in insertion order and recomputes `total_items`
//! and `total_price_cents` after every successful mutation. Validation
//! happens before anything is touched, so a failed call leaves the cart as it
//! was.

mod line;

pub use line::CartLine;

use crate::catalog::{Product, ProductId, SellerId};
use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartLines")]
pub struct Cart {
  lines: Vec<CartLine>,
  total_items: u64,
  total_price_cents: i64,
}

/// Wire shape accepted when a cart is restored; totals are always recomputed.
#[derive(Deserialize)]
struct CartLines {
  #[serde(default)]
  lines: Vec<CartLine>,
}

impl TryFrom<CartLines> for Cart {
  type Error = ShopError;

  /// Rejects lines a cart could never have produced: zero quantities,
  /// negative prices, repeated products, or totals outside `i64`.
  fn try_from(raw: CartLines) -> ShopResult<Self> {
    for (idx, line) in raw.lines.iter().enumerate() {
      if line.quantity == 0 {
        return Err(ShopError::InvalidQuantity(format!(
          "restored line for product {} has quantity 0",
          line.product_id
        )));
      }
      if line.unit_price_cents < 0 {
        return Err(ShopError::InvalidProduct(format!(
          "restored line for product {} has a negative price",
          line.product_id
        )));
      }
      if raw.lines[..idx].iter().any(|l| l.product_id == line.product_id) {
        return Err(ShopError::InvalidQuantity(format!(
          "product {} appears on more than one restored line",
          line.product_id
        )));
      }
    }

    let mut total_price_cents: i64 = 0;
    for line in &raw.lines {
      total_price_cents = line
        .checked_line_total_cents()
        .and_then(|t| total_price_cents.checked_add(t))
        .ok_or(ShopError::AmountOverflow)?;
    }

    let mut cart = Cart {
      lines: raw.lines,
      ..Default::default()
    };
    cart.recompute_totals();
    Ok(cart)
  }
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn total_items(&self) -> u64 {
    self.total_items
  }

  pub fn total_price_cents(&self) -> i64 {
    self.total_price_cents
  }

  /// Adds `quantity` of `product`, merging into an existing line.
  ///
  /// The existing quantity plus the requested one is checked against the
  /// product's stock as a single amount.
  pub fn add(&mut self, product: &Product, quantity: i64) -> ShopResult<()> {
    product.validate()?;
    if quantity < 1 {
      return Err(ShopError::InvalidQuantity(format!(
        "{} (must be at least 1)",
        quantity
      )));
    }

    let existing = self.line(product.id).map_or(0, |l| u64::from(l.quantity));
    let requested = existing.saturating_add(quantity as u64);
    if requested > u64::from(product.stock) {
      warn!(
        product_id = product.id,
        requested,
        available = product.stock,
        "Cart add rejected: insufficient stock."
      );
      return Err(ShopError::OutOfStock {
        product_id: product.id,
        requested,
        available: product.stock,
      });
    }
    // requested <= stock, so it fits in u32.
    let new_quantity = requested as u32;
    let unit_price_cents = self.line(product.id).map_or(product.price_cents, |l| l.unit_price_cents);
    self.price_with(product.id, new_quantity, unit_price_cents)?;

    match self.lines.iter_mut().find(|l| l.product_id == product.id) {
      Some(line) => {
        line.quantity = new_quantity;
        line.stock_limit = product.stock;
      }
      None => self.lines.push(CartLine::from_product(product, new_quantity)),
    }

    self.recompute_totals();
    debug!(product_id = product.id, quantity = new_quantity, "Cart line added or merged.");
    Ok(())
  }

  /// Sets a line's quantity outright. Zero or less removes the line.
  pub fn update(&mut self, product_id: ProductId, new_quantity: i64) -> ShopResult<()> {
    let idx = self
      .position(product_id)
      .ok_or_else(|| ShopError::line_not_found(product_id))?;

    if new_quantity <= 0 {
      self.lines.remove(idx);
      self.recompute_totals();
      debug!(product_id, "Cart line removed by zero quantity update.");
      return Ok(());
    }

    let (stock_limit, unit_price_cents) = (self.lines[idx].stock_limit, self.lines[idx].unit_price_cents);
    if new_quantity as u64 > u64::from(stock_limit) {
      warn!(
        product_id,
        requested = new_quantity,
        available = stock_limit,
        "Cart update rejected: insufficient stock."
      );
      return Err(ShopError::OutOfStock {
        product_id,
        requested: new_quantity as u64,
        available: stock_limit,
      });
    }
    // new_quantity <= stock_limit, so it fits in u32.
    let new_quantity = new_quantity as u32;
    self.price_with(product_id, new_quantity, unit_price_cents)?;
    self.lines[idx].quantity = new_quantity;

    self.recompute_totals();
    Ok(())
  }

  /// Replaces the stock a line is validated against.
  pub fn refresh_stock_limit(&mut self, product_id: ProductId, stock: u32) -> ShopResult<()> {
    let line = self
      .lines
      .iter_mut()
      .find(|l| l.product_id == product_id)
      .ok_or_else(|| ShopError::line_not_found(product_id))?;
    line.stock_limit = stock;
    Ok(())
  }

  pub fn remove(&mut self, product_id: ProductId) -> ShopResult<CartLine> {
    let idx = self
      .position(product_id)
      .ok_or_else(|| ShopError::line_not_found(product_id))?;
    let removed = self.lines.remove(idx);
    self.recompute_totals();
    Ok(removed)
  }

  pub fn clear(&mut self) {
    self.lines.clear();
    self.recompute_totals();
  }

  /// Keeps only the lines for which `keep` returns true.
  pub fn retain(&mut self, keep: impl FnMut(&CartLine) -> bool) {
    self.lines.retain(keep);
    self.recompute_totals();
  }

  /// Lines grouped by seller, groups in order of each seller's first line.
  pub fn lines_by_seller(&self) -> Vec<(Option<SellerId>, Vec<CartLine>)> {
    let mut groups: Vec<(Option<SellerId>, Vec<CartLine>)> = Vec::new();
    for line in &self.lines {
      match groups.iter_mut().find(|(seller, _)| *seller == line.seller_id) {
        Some((_, lines)) => lines.push(line.clone()),
        None => groups.push((line.seller_id, vec![line.clone()])),
      }
    }
    groups
  }

  fn position(&self, product_id: ProductId) -> Option<usize> {
    self.lines.iter().position(|l| l.product_id == product_id)
  }

  /// Cart total if `product_id`'s line held `quantity` at `unit_price_cents`.
  /// Fails instead of overflowing, before anything is changed.
  fn price_with(&self, product_id: ProductId, quantity: u32, unit_price_cents: i64) -> ShopResult<i64> {
    let others = self.total_price_cents - self.line(product_id).map_or(0, CartLine::line_total_cents);
    i64::from(quantity)
      .checked_mul(unit_price_cents)
      .and_then(|line_total| others.checked_add(line_total))
      .ok_or_else(|| {
        warn!(product_id, quantity, unit_price_cents, "Cart change rejected: amount overflow.");
        ShopError::AmountOverflow
      })
  }

  /// Every line's total and their sum are known to fit at this point.
  fn recompute_totals(&mut self) {
    self.total_items = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
    self.total_price_cents = self.lines.iter().map(CartLine::line_total_cents).sum();
  }
}
