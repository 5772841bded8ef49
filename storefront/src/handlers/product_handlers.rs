// storefront/src/handlers/product_handlers.rs

//! Storefront browsing plus the back-office product writes.

use crate::errors::{AppError, Result};
use crate::handlers::parse_payload;
use crate::handlers::views::ProductView;
use crate::state::AppState;
use marivor_core::{
  featured_products as featured_selection, parse_minor_units, Category, Product, ProductChanges, ProductDraft,
  ProductId, ProductLookup, ProductStore, SellerId,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Products per category on the home page.
pub const FEATURED_PER_CATEGORY: usize = 2;

#[derive(Deserialize, Debug)]
pub struct CreateProductRequestPayload {
  pub name: String,
  pub category: String,
  pub price: Value,
  pub stock: Value,
  #[serde(default)]
  pub sold_by_weight: bool,
  #[serde(default)]
  pub seller_id: Option<SellerId>,
}

/// Omitted or `null` fields are left unchanged, as are blank prices and stock counts.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateProductRequestPayload {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub price: Option<Value>,
  #[serde(default)]
  pub stock: Option<Value>,
  #[serde(default)]
  pub sold_by_weight: Option<bool>,
}

/// Reads a price in major units, sent as a JSON number or a decimal string.
pub fn parse_price(raw: &Value) -> Result<i64> {
  let text = match raw {
    Value::Number(n) => n.to_string(),
    Value::String(s) => s.trim().to_string(),
    other => other.to_string(),
  };
  parse_minor_units(&text).ok_or_else(|| AppError::Validation(format!("Price {} is not a valid amount.", raw)))
}

/// Reads a stock count, sent as a JSON integer or an integer string.
pub fn parse_stock(raw: &Value) -> Result<u32> {
  let parsed = match raw {
    Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
    Value::String(s) => s.trim().parse::<u32>().ok(),
    _ => None,
  };
  parsed.ok_or_else(|| AppError::Validation(format!("Stock {} is not a whole number of at least 0.", raw)))
}

fn is_blank(raw: &Value) -> bool {
  match raw {
    Value::Null => true,
    Value::String(s) => s.trim().is_empty(),
    _ => false,
  }
}

fn views(app_state: &AppState, products: &[Product]) -> Vec<ProductView> {
  let currency = &app_state.config.currency_code;
  products.iter().map(|p| ProductView::from_product(p, currency)).collect()
}

/// `category` is `all` (or empty) or a category name.
#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products(app_state: &AppState, category: &str) -> Result<Vec<ProductView>> {
  let products = match category.trim() {
    "" => app_state.catalog.list_products().await?,
    c if c.eq_ignore_ascii_case("all") => app_state.catalog.list_products().await?,
    c => {
      let category: Category = c.parse()?;
      app_state.catalog.products_by_category(category, None).await?
    }
  };

  info!("Listed {} product(s).", products.len());
  Ok(views(app_state, &products))
}

#[instrument(name = "handler::featured_products", skip(app_state))]
pub async fn featured_products(app_state: &AppState) -> Result<Vec<ProductView>> {
  let products = featured_selection(app_state.catalog.as_ref(), FEATURED_PER_CATEGORY).await?;
  Ok(views(app_state, &products))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product(app_state: &AppState, product_id: ProductId) -> Result<ProductView> {
  let product = app_state.catalog.get_product(product_id).await?;
  Ok(ProductView::from_product(&product, &app_state.config.currency_code))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product(app_state: &AppState, payload: Value) -> Result<ProductView> {
  let req: CreateProductRequestPayload = parse_payload(payload)?;
  let draft = ProductDraft {
    name: req.name,
    category: req.category.parse::<Category>()?,
    price_cents: parse_price(&req.price)?,
    stock: parse_stock(&req.stock)?,
    sold_by_weight: req.sold_by_weight,
    seller_id: req.seller_id,
  };

  let product = app_state.catalog.create_product(draft).await.map_err(|e| {
    warn!("Product creation rejected: {}", e);
    AppError::from(e)
  })?;
  info!("Product {} '{}' created.", product.id, product.name);
  Ok(ProductView::from_product(&product, &app_state.config.currency_code))
}

#[instrument(name = "handler::update_product", skip(app_state, payload))]
pub async fn update_product(app_state: &AppState, product_id: ProductId, payload: Value) -> Result<ProductView> {
  let req: UpdateProductRequestPayload = parse_payload(payload)?;
  let changes = ProductChanges {
    name: req.name,
    category: match req.category.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(c) => Some(c.parse::<Category>()?),
    },
    price_cents: match req.price.as_ref().filter(|v| !is_blank(v)) {
      Some(raw) => Some(parse_price(raw)?),
      None => None,
    },
    stock: match req.stock.as_ref().filter(|v| !is_blank(v)) {
      Some(raw) => Some(parse_stock(raw)?),
      None => None,
    },
    sold_by_weight: req.sold_by_weight,
  };

  let product = app_state.catalog.update_product(product_id, changes).await?;
  info!("Product {} updated.", product.id);
  Ok(ProductView::from_product(&product, &app_state.config.currency_code))
}

#[instrument(name = "handler::delete_product", skip(app_state))]
pub async fn delete_product(app_state: &AppState, product_id: ProductId) -> Result<ProductView> {
  let product = app_state.catalog.delete_product(product_id).await?;
  info!("Product {} '{}' deleted.", product.id, product.name);
  Ok(ProductView::from_product(&product, &app_state.config.currency_code))
}
