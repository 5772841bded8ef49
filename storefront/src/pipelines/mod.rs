// storefront/src/pipelines/mod.rs

//! Every pipeline the storefront runs, and their registration.

use crate::errors::AppError;
use marivor_core::Registry;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod order_status_pipeline;

/// Registers every storefront pipeline. Called once when `AppState` is built.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering storefront pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(registry);
  cart_pipeline::register_update_cart_line_pipeline(registry);
  cart_pipeline::register_remove_from_cart_pipeline(registry);
  checkout_pipeline::register_checkout_pipeline(registry);
  order_status_pipeline::register_order_status_pipeline(registry);

  tracing::info!("All storefront pipelines registered.");
}
