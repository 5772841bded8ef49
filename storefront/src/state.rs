// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::pipelines;
use marivor_core::{InMemoryCatalog, InMemoryOrderStore, OrderStore, Product, ProductStore, Registry, SessionStore};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<dyn ProductStore>,
  pub orders: Arc<dyn OrderStore>,
  pub sessions: Arc<SessionStore>,
  pub workflows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the collaborators together and registers every pipeline.
  pub fn new(config: AppConfig, catalog: Arc<dyn ProductStore>, orders: Arc<dyn OrderStore>) -> Self {
    let workflows = Arc::new(Registry::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);

    Self {
      catalog,
      orders,
      sessions: Arc::new(SessionStore::new()),
      workflows,
      config: Arc::new(config),
    }
  }

  /// In-memory catalog and order store, seeded from `seed_catalog_path` when set.
  pub fn in_memory(config: AppConfig) -> Result<Self> {
    let catalog = match &config.seed_catalog_path {
      Some(path) => load_seed_catalog(path)?,
      None => InMemoryCatalog::new(),
    };
    Ok(Self::new(config, Arc::new(catalog), Arc::new(InMemoryOrderStore::new())))
  }
}

/// Reads a JSON array of products.
pub fn load_seed_catalog(path: &Path) -> Result<InMemoryCatalog> {
  let raw = std::fs::read_to_string(path)
    .map_err(|e| AppError::Config(format!("Cannot read seed catalog {}: {}", path.display(), e)))?;
  let products: Vec<Product> = serde_json::from_str(&raw)
    .map_err(|e| AppError::Config(format!("Invalid seed catalog {}: {}", path.display(), e)))?;

  let count = products.len();
  let catalog = InMemoryCatalog::with_products(products)
    .map_err(|e| AppError::Config(format!("Invalid seed catalog {}: {}", path.display(), e)))?;

  tracing::info!(path = %path.display(), count, "Seed catalog loaded.");
  Ok(catalog)
}
