// core/src/catalog.rs

//! Product records, the Product Lookup collaborator, and the write side the
//! back office uses to manage the catalog.

use crate::error::{ShopError, ShopResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type ProductId = i64;
pub type SellerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  Fish,
  Vegetable,
}

impl Category {
  pub const ALL: [Category; 2] = [Category::Fish, Category::Vegetable];

  pub fn as_str(self) -> &'static str {
    match self {
      Category::Fish => "Fish",
      Category::Vegetable => "Vegetable",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = ShopError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "fish" => Ok(Category::Fish),
      "vegetable" => Ok(Category::Vegetable),
      _ => Err(ShopError::InvalidProduct(format!("unknown category '{}'", s))),
    }
  }
}

/// A product row as the storefront sees it. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub category: Category,
  pub price_cents: i64,
  pub stock: u32,
  /// Priced per kilogram rather than per piece.
  #[serde(default)]
  pub sold_by_weight: bool,
  #[serde(default)]
  pub seller_id: Option<SellerId>,
}

impl Product {
  /// A product needs a name and a price that is not negative.
  pub fn validate(&self) -> ShopResult<()> {
    if self.name.trim().is_empty() {
      return Err(ShopError::InvalidProduct(format!("product {} has no name", self.id)));
    }
    if self.price_cents < 0 {
      return Err(ShopError::InvalidProduct(format!(
        "product {} has a negative price ({})",
        self.id, self.price_cents
      )));
    }
    Ok(())
  }
}

/// A product that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
  pub name: String,
  pub category: Category,
  pub price_cents: i64,
  pub stock: u32,
  #[serde(default)]
  pub sold_by_weight: bool,
  #[serde(default)]
  pub seller_id: Option<SellerId>,
}

impl ProductDraft {
  pub fn into_product(self, id: ProductId) -> ShopResult<Product> {
    let product = Product {
      id,
      name: self.name.trim().to_string(),
      category: self.category,
      price_cents: self.price_cents,
      stock: self.stock,
      sold_by_weight: self.sold_by_weight,
      seller_id: self.seller_id,
    };
    product.validate()?;
    Ok(product)
  }
}

/// A partial edit. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub category: Option<Category>,
  pub price_cents: Option<i64>,
  pub stock: Option<u32>,
  pub sold_by_weight: Option<bool>,
}

impl ProductChanges {
  /// Returns the edited product, or an error without touching `product`.
  pub fn apply_to(&self, product: &Product) -> ShopResult<Product> {
    let mut edited = product.clone();
    if let Some(name) = &self.name {
      edited.name = name.trim().to_string();
    }
    if let Some(category) = self.category {
      edited.category = category;
    }
    if let Some(price_cents) = self.price_cents {
      edited.price_cents = price_cents;
    }
    if let Some(stock) = self.stock {
      edited.stock = stock;
    }
    if let Some(sold_by_weight) = self.sold_by_weight {
      edited.sold_by_weight = sold_by_weight;
    }
    edited.validate()?;
    Ok(edited)
  }
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductLookup: Send + Sync {
  /// Fails with `ShopError::NotFound` when no product has this id.
  async fn get_product(&self, id: ProductId) -> ShopResult<Product>;

  async fn list_products(&self) -> ShopResult<Vec<Product>>;

  /// Products of one category in catalog order, at most `limit` of them.
  async fn products_by_category(&self, category: Category, limit: Option<usize>) -> ShopResult<Vec<Product>> {
    let products = self.list_products().await?;
    Ok(
      products
        .into_iter()
        .filter(|p| p.category == category)
        .take(limit.unwrap_or(usize::MAX))
        .collect(),
    )
  }
}

/// Write access used by the back office. Every write validates the product first.
#[async_trait]
pub trait ProductStore: ProductLookup {
  async fn create_product(&self, draft: ProductDraft) -> ShopResult<Product>;

  async fn update_product(&self, id: ProductId, changes: ProductChanges) -> ShopResult<Product>;

  /// Returns the removed product.
  async fn delete_product(&self, id: ProductId) -> ShopResult<Product>;
}

/// The home page selection: the first `per_category` products of each category.
pub async fn featured_products<C>(catalog: &C, per_category: usize) -> ShopResult<Vec<Product>>
where
  C: ProductLookup + ?Sized,
{
  let mut featured = Vec::new();
  for category in Category::ALL {
    featured.extend(catalog.products_by_category(category, Some(per_category)).await?);
  }
  Ok(featured)
}

/// Catalog held in memory, ordered by product id.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
  products: RwLock<BTreeMap<ProductId, Product>>,
}

impl InMemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fails on the first product that does not validate.
  pub fn with_products(products: impl IntoIterator<Item = Product>) -> ShopResult<Self> {
    let catalog = Self::new();
    for product in products {
      catalog.upsert(product)?;
    }
    Ok(catalog)
  }

  /// Inserts or replaces a product, returning the previous row if any.
  pub fn upsert(&self, product: Product) -> ShopResult<Option<Product>> {
    product.validate()?;
    Ok(self.products.write().insert(product.id, product))
  }

  pub fn set_stock(&self, id: ProductId, stock: u32) -> ShopResult<()> {
    let mut products = self.products.write();
    let product = products.get_mut(&id).ok_or_else(|| ShopError::product_not_found(id))?;
    product.stock = stock;
    Ok(())
  }
}

#[async_trait]
impl ProductLookup for InMemoryCatalog {
  async fn get_product(&self, id: ProductId) -> ShopResult<Product> {
    self
      .products
      .read()
      .get(&id)
      .cloned()
      .ok_or_else(|| ShopError::product_not_found(id))
  }

  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    Ok(self.products.read().values().cloned().collect())
  }
}

#[async_trait]
impl ProductStore for InMemoryCatalog {
  async fn create_product(&self, draft: ProductDraft) -> ShopResult<Product> {
    let mut products = self.products.write();
    let id = products.keys().next_back().map_or(1, |last| last + 1);
    let product = draft.into_product(id)?;
    products.insert(id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, id: ProductId, changes: ProductChanges) -> ShopResult<Product> {
    let mut products = self.products.write();
    let stored = products.get_mut(&id).ok_or_else(|| ShopError::product_not_found(id))?;
    let edited = changes.apply_to(stored)?;
    *stored = edited.clone();
    Ok(edited)
  }

  async fn delete_product(&self, id: ProductId) -> ShopResult<Product> {
    self
      .products
      .write()
      .remove(&id)
      .ok_or_else(|| ShopError::product_not_found(id))
  }
}
